//! Account CLI commands.
//!
//! Registration, login and logout against the local session store. The
//! store is the JSON file at `[session] store`.

use clap::Subcommand;
use cohortscope::session::{KeyValueStore, SessionContext};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Auth subcommands.
#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Create an account and log in
    Register {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },

    /// Log in to an existing account
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },

    /// Log out the current user
    Logout,

    /// Request a password reset link
    Reset {
        /// Account email
        email: String,
    },

    /// Show the logged-in user
    Whoami,
}

/// Run an auth subcommand.
pub fn run(command: AuthCommands) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(false)?;
    runner.log_startup("auth");

    let mut session = runner.session();
    for line in execute(&mut session, command)? {
        println!("{}", line);
    }
    Ok(())
}

/// Apply `command` to `session`, returning the lines to print.
fn execute<S: KeyValueStore>(
    session: &mut SessionContext<S>,
    command: AuthCommands,
) -> Result<Vec<String>, CliError> {
    let lines = match command {
        AuthCommands::Register { email, password } => {
            session.register(&email, &password)?;
            vec![format!("✓ Registered and logged in as {}", email)]
        }
        AuthCommands::Login { email, password } => {
            session.login(&email, &password)?;
            vec![format!("✓ Logged in as {}", email)]
        }
        AuthCommands::Logout => match session.current_user()? {
            Some(email) => {
                session.logout()?;
                vec![format!("Logged out {}", email)]
            }
            None => vec!["Not logged in".to_string()],
        },
        AuthCommands::Reset { email } => {
            session.reset_password(&email)?;
            vec![format!("Password reset link sent to {}", email)]
        }
        AuthCommands::Whoami => match session.current_user()? {
            Some(email) => vec![email],
            None => return Err(CliError::NotLoggedIn),
        },
    };
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohortscope::session::{MemoryStore, SessionError};

    fn register(session: &mut SessionContext<MemoryStore>) {
        execute(
            session,
            AuthCommands::Register {
                email: "ana@example.com".to_string(),
                password: "secret".to_string(),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_register_then_whoami() {
        let mut session = SessionContext::new(MemoryStore::new());
        register(&mut session);

        let lines = execute(&mut session, AuthCommands::Whoami).unwrap();
        assert_eq!(lines, vec!["ana@example.com".to_string()]);
    }

    #[test]
    fn test_whoami_without_login_fails() {
        let mut session = SessionContext::new(MemoryStore::new());
        let result = execute(&mut session, AuthCommands::Whoami);
        assert!(matches!(result, Err(CliError::NotLoggedIn)));
    }

    #[test]
    fn test_logout_clears_current_user() {
        let mut session = SessionContext::new(MemoryStore::new());
        register(&mut session);

        let lines = execute(&mut session, AuthCommands::Logout).unwrap();
        assert_eq!(lines, vec!["Logged out ana@example.com".to_string()]);
        assert!(!session.is_logged_in().unwrap());

        let lines = execute(&mut session, AuthCommands::Logout).unwrap();
        assert_eq!(lines, vec!["Not logged in".to_string()]);
    }

    #[test]
    fn test_wrong_password_is_session_error() {
        let mut session = SessionContext::new(MemoryStore::new());
        register(&mut session);
        execute(&mut session, AuthCommands::Logout).unwrap();

        let result = execute(
            &mut session,
            AuthCommands::Login {
                email: "ana@example.com".to_string(),
                password: "wrong".to_string(),
            },
        );
        assert!(matches!(
            result,
            Err(CliError::Session(SessionError::InvalidPassword))
        ));
    }

    #[test]
    fn test_reset_unknown_account() {
        let mut session = SessionContext::new(MemoryStore::new());
        let result = execute(
            &mut session,
            AuthCommands::Reset {
                email: "nobody@example.com".to_string(),
            },
        );
        assert!(matches!(
            result,
            Err(CliError::Session(SessionError::AccountNotFound))
        ));
    }
}
