//! Credential resolution
//!
//! The password is taken from an ordered chain of providers (CLI flag,
//! environment variable, interactive prompt). The first non-empty value wins.

use crate::error::PipelineError;

/// Resolved login for the data store.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One source of a password.
pub trait CredentialProvider {
    fn name(&self) -> &str;

    /// `Ok(None)` means this provider has nothing to offer and the next one is tried.
    fn password(&self) -> Result<Option<String>, PipelineError>;
}

/// Password passed with `-p/--password`.
pub struct FlagPassword(pub Option<String>);

impl CredentialProvider for FlagPassword {
    fn name(&self) -> &str {
        "--password"
    }

    fn password(&self) -> Result<Option<String>, PipelineError> {
        Ok(self.0.clone().filter(|p| !p.is_empty()))
    }
}

/// Password read from an environment variable.
pub struct EnvPassword {
    pub var: String,
}

impl CredentialProvider for EnvPassword {
    fn name(&self) -> &str {
        &self.var
    }

    fn password(&self) -> Result<Option<String>, PipelineError> {
        match std::env::var(&self.var) {
            Ok(value) if value.is_empty() => {
                tracing::error!("Password in variable \"{}\" is empty!", self.var);
                Ok(None)
            }
            Ok(value) => Ok(Some(value)),
            Err(_) => Ok(None),
        }
    }
}

/// Password typed at an interactive prompt.
pub struct PromptPassword {
    pub prompt: String,
}

impl Default for PromptPassword {
    fn default() -> Self {
        Self {
            prompt: "Please enter your ICDC password".to_string(),
        }
    }
}

impl CredentialProvider for PromptPassword {
    fn name(&self) -> &str {
        "prompt"
    }

    fn password(&self) -> Result<Option<String>, PipelineError> {
        let value = dialoguer::Password::new()
            .with_prompt(&self.prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PipelineError::ConfigError(format!("Failed to read password: {}", e)))?;
        Ok(Some(value).filter(|p| !p.is_empty()))
    }
}

/// Ordered list of credential providers.
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }

    /// Standard chain: flag, then `password_env`, then interactive prompt.
    pub fn standard(flag: Option<String>, password_env: &str) -> Self {
        Self::new(vec![
            Box::new(FlagPassword(flag)),
            Box::new(EnvPassword {
                var: password_env.to_string(),
            }),
            Box::new(PromptPassword::default()),
        ])
    }

    pub fn resolve(&self, user: &str) -> Result<Credentials, PipelineError> {
        for provider in &self.providers {
            if let Some(password) = provider.password()? {
                tracing::debug!(source = provider.name(), "Password resolved");
                return Ok(Credentials {
                    user: user.to_string(),
                    password,
                });
            }
        }
        Err(PipelineError::ConfigError(
            "Data pipeline can not work without a valid password!".to_string(),
        ))
    }
}
