//! Active-application resolution.
//!
//! The dispatcher needs the name of the frontmost application to pick the
//! few-shot examples and parameterize the system instruction. The OS query
//! itself is an external collaborator consumed through the narrow
//! [`ActiveAppResolver`] seam.
//!
//! [`FrontmostResolver`] asks the OS on macOS and degrades to a configured
//! fallback name elsewhere; [`StaticResolver`] always answers with a fixed
//! name (tests, headless use).

// ---------------------------------------------------------------------------
// ActiveAppResolver trait
// ---------------------------------------------------------------------------

/// Resolves the name of the application that currently has input focus.
pub trait ActiveAppResolver: Send + Sync {
    /// The frontmost application's name, as it should be matched against the
    /// configured example sets.
    fn current_application_name(&self) -> String;
}

// ---------------------------------------------------------------------------
// StaticResolver
// ---------------------------------------------------------------------------

/// Always reports the same application name.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    name: String,
}

impl StaticResolver {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ActiveAppResolver for StaticResolver {
    fn current_application_name(&self) -> String {
        self.name.clone()
    }
}

// ---------------------------------------------------------------------------
// FrontmostResolver
// ---------------------------------------------------------------------------

/// Queries the OS for the frontmost application.
///
/// On macOS this shells out to System Events via `osascript`; on other
/// platforms (and whenever the query fails) it answers with the fallback
/// name, so dispatch still runs with the generic instruction and no
/// program-specific examples.
#[derive(Debug, Clone)]
pub struct FrontmostResolver {
    fallback: String,
}

impl FrontmostResolver {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }

    #[cfg(target_os = "macos")]
    fn query_os(&self) -> Option<String> {
        let output = std::process::Command::new("osascript")
            .arg("-e")
            .arg("tell application \"System Events\" to get name of first process whose frontmost is true")
            .output()
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    #[cfg(not(target_os = "macos"))]
    fn query_os(&self) -> Option<String> {
        None
    }
}

impl ActiveAppResolver for FrontmostResolver {
    fn current_application_name(&self) -> String {
        match self.query_os() {
            Some(name) => name,
            None => {
                log::debug!(
                    "frontmost application unavailable, using {:?}",
                    self.fallback
                );
                self.fallback.clone()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
