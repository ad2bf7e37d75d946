// Line-oriented admin console
use crate::application::dashboard_service::{Dashboard, Outcome, Section};
use crate::application::prompt::Prompt;
use crate::domain::action::RowAction;
use crate::domain::filter::UnknownValue;
use crate::domain::maintenance::MaintenanceStatus;
use crate::infrastructure::session::SessionStore;
use crate::presentation::badge::Palette;
use crate::presentation::screen;
use async_trait::async_trait;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

const HELP: &str = "\
Sections:  overview | rooms | alerts | maintenance | packages | community
View:      refresh | filter <control> <value> | search <text>
Rows:      open <row> | resolve <row> | status <row> <pending|in_progress|resolved>
           notify <row> | pickup <row> | close <row> | delete <row>
Packages:  new-package
Session:   logout | help | quit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(Section),
    Refresh,
    Filter { control: String, value: String },
    Search(String),
    Row { action: RowAction, row: usize },
    Status { row: usize, status: MaintenanceStatus },
    NewPackage,
    Logout,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("'{0}' is not a row number")]
    InvalidRow(String),
    #[error(transparent)]
    InvalidStatus(#[from] UnknownValue),
}

fn parse_row(word: Option<&str>, usage: &'static str) -> Result<usize, CommandError> {
    let word = word.ok_or(CommandError::Usage(usage))?;
    word.parse()
        .map_err(|_| CommandError::InvalidRow(word.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));
        let mut args = rest.split_whitespace();

        let row_action = |action: RowAction, usage: &'static str| {
            parse_row(rest.split_whitespace().next(), usage).map(|row| Command::Row { action, row })
        };

        if let Ok(section) = name.parse::<Section>() {
            return Ok(Command::Navigate(section));
        }

        match name {
            "refresh" => Ok(Command::Refresh),
            "filter" => {
                let (control, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage("filter <control> <value>"))?;
                Ok(Command::Filter {
                    control: control.to_string(),
                    value: value.trim().to_string(),
                })
            }
            "search" => Ok(Command::Search(rest.to_string())),
            "open" => row_action(RowAction::Open, "open <row>"),
            "resolve" => row_action(RowAction::Resolve, "resolve <row>"),
            "notify" => row_action(RowAction::Notify, "notify <row>"),
            "pickup" => row_action(RowAction::PickUp, "pickup <row>"),
            "close" => row_action(RowAction::Close, "close <row>"),
            "delete" => row_action(RowAction::Delete, "delete <row>"),
            "status" => {
                const USAGE: &str = "status <row> <value>";
                let row = parse_row(args.next(), USAGE)?;
                let status = args
                    .next()
                    .ok_or(CommandError::Usage(USAGE))?
                    .parse::<MaintenanceStatus>()?;
                Ok(Command::Status { row, status })
            }
            "new-package" => Ok(Command::NewPackage),
            "logout" => Ok(Command::Logout),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Reader/writer pair the console talks through. Also answers the
/// dashboard's prompts.
pub struct Terminal<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    async fn write(&mut self, text: &str) -> std::io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await
    }

    /// Next input line; `None` at end of input
    async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        self.lines.next_line().await
    }

    async fn question(&mut self, text: &str) -> Option<String> {
        if let Err(e) = self.write(text).await {
            tracing::warn!(error = %e, "failed to write prompt");
            return None;
        }
        match self.read_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read answer");
                None
            }
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }
}

#[async_trait]
impl<R, W> Prompt for Terminal<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn alert(&mut self, message: &str) {
        if let Err(e) = self.write(&format!("! {message}\n")).await {
            tracing::warn!(error = %e, "failed to show alert");
        }
    }

    async fn confirm(&mut self, question: &str) -> bool {
        self.question(&format!("{question} [y/N] "))
            .await
            .is_some_and(|answer| matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
    }

    async fn ask(&mut self, label: &str) -> String {
        self.question(&format!("{label}: ")).await.unwrap_or_default()
    }
}

enum Flow {
    Continue,
    Exit,
}

pub struct Console<R, W> {
    dashboard: Dashboard,
    session: SessionStore,
    terminal: Terminal<R, W>,
    palette: Palette,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(dashboard: Dashboard, session: SessionStore, terminal: Terminal<R, W>) -> Self {
        Self {
            dashboard,
            session,
            terminal,
            palette: Palette::Plain,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Show the overview, then execute commands until `quit`, `logout` or
    /// end of input
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.dashboard.navigate(Section::Overview).await;
        self.terminal
            .write(&screen::render(&self.dashboard, self.palette))
            .await?;

        loop {
            self.terminal.write("> ").await?;
            let Some(line) = self.terminal.read_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    self.terminal
                        .write(&format!("{e}\nType 'help' for the list of commands.\n"))
                        .await?;
                    continue;
                }
            };

            tracing::debug!(?command, section = %self.dashboard.section(), "executing");
            if let Flow::Exit = self.execute(command).await? {
                break;
            }
        }
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> anyhow::Result<Flow> {
        let result = match command {
            Command::Navigate(section) => {
                self.dashboard.navigate(section).await;
                Ok(None)
            }
            Command::Refresh => {
                self.dashboard.refresh().await;
                Ok(None)
            }
            Command::Filter { control, value } => {
                self.dashboard.apply_filter(&control, &value).await.map(|_| None)
            }
            Command::Search(text) => self.dashboard.search_rooms(&text).map(|_| None),
            Command::Row { action, row } => self
                .dashboard
                .trigger(row, action, &mut self.terminal)
                .await
                .map(Some),
            Command::Status { row, status } => self
                .dashboard
                .set_maintenance_status(row, status, &mut self.terminal)
                .await
                .map(Some),
            Command::NewPackage => self
                .dashboard
                .create_package(&mut self.terminal)
                .await
                .map(Some),
            Command::Logout => {
                let login_url = self.session.logout()?;
                tracing::info!("signed out");
                self.terminal
                    .write(&format!("Signed out. Sign in again at {login_url}\n"))
                    .await?;
                return Ok(Flow::Exit);
            }
            Command::Help => {
                self.terminal.write(HELP).await?;
                Ok(None)
            }
            Command::Quit => return Ok(Flow::Exit),
        };

        match result {
            Ok(Some(Outcome::Cancelled)) => self.terminal.write("Cancelled.\n").await?,
            Ok(_) => {}
            Err(e) => self.terminal.write(&format!("{e}\n")).await?,
        }
        self.terminal
            .write(&screen::render(&self.dashboard, self.palette))
            .await?;
        Ok(Flow::Continue)
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.terminal.into_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::SessionSettings;
    use crate::infrastructure::memory_data_source::InMemoryDataSource;
    use std::sync::Arc;
    use tokio::io::BufReader;

    #[test]
    fn test_parse_commands() {
        assert_eq!("alerts".parse::<Command>(), Ok(Command::Navigate(Section::Alerts)));
        assert_eq!("sensors".parse::<Command>(), Ok(Command::Navigate(Section::Rooms)));
        assert_eq!(
            "filter category free stuff".parse::<Command>(),
            Ok(Command::Filter {
                control: "category".into(),
                value: "free stuff".into(),
            })
        );
        assert_eq!(
            "  pickup 2 ".parse::<Command>(),
            Ok(Command::Row {
                action: RowAction::PickUp,
                row: 2,
            })
        );
        assert_eq!(
            "status 1 in_progress".parse::<Command>(),
            Ok(Command::Status {
                row: 1,
                status: MaintenanceStatus::InProgress,
            })
        );
        assert_eq!("search".parse::<Command>(), Ok(Command::Search(String::new())));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "frobnicate".parse::<Command>(),
            Err(CommandError::Unknown("frobnicate".into()))
        );
        assert_eq!(
            "resolve".parse::<Command>(),
            Err(CommandError::Usage("resolve <row>"))
        );
        assert_eq!(
            "delete two".parse::<Command>(),
            Err(CommandError::InvalidRow("two".into()))
        );
        assert_eq!(
            "filter status".parse::<Command>(),
            Err(CommandError::Usage("filter <control> <value>"))
        );
        assert!(matches!(
            "status 1 done".parse::<Command>(),
            Err(CommandError::InvalidStatus(_))
        ));
    }

    async fn run_script(script: &str, dir: &tempfile::TempDir) -> String {
        run_script_with(script, dir, Palette::Plain).await
    }

    async fn run_script_with(script: &str, dir: &tempfile::TempDir, palette: Palette) -> String {
        let session = SessionStore::new(&SessionSettings {
            role_file: dir.path().join("role"),
            login_url: "login.html".into(),
        });
        let dashboard = Dashboard::new(Arc::new(InMemoryDataSource::with_fixtures()));
        let terminal = Terminal::new(BufReader::new(script.as_bytes()), Vec::new());
        let mut console = Console::new(dashboard, session, terminal).with_palette(palette);
        console.run().await.unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_updates_table() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_script("alerts\nresolve 1\nresolve 1\nquit\n", &dir).await;

        assert!(output.starts_with("== Overview =="));
        assert!(output.contains("== Alerts =="));
        assert!(output.contains("'Resolve' is not offered on row 1"));
        assert!(!output.contains("Type 'help'"));
    }

    #[tokio::test]
    async fn test_declined_delete_and_new_package_form() {
        let dir = tempfile::tempdir().unwrap();
        let script = "packages\ndelete 1\nn\nnew-package\n3B\n \nLocker\nnew-package\n4C\nFedEx\nLocker B\n";
        let output = run_script(script, &dir).await;

        assert!(output.contains("Are you sure you want to delete this package? [y/N] Cancelled."));
        assert!(output.contains("! Please fill in all fields."));
        assert!(output.contains("Resident 4C"));
        assert!(output.contains("FedEx"));
    }

    #[tokio::test]
    async fn test_bad_input_and_logout() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("role"), "admin").unwrap();
        let output = run_script("dance\nrooms\nsearch bedroom\nlogout\nalerts\n", &dir).await;

        assert!(output.contains("unknown command 'dance'\nType 'help' for the list of commands."));
        assert!(output.contains("Search: bedroom"));
        assert!(output.contains("Signed out. Sign in again at login.html"));
        assert!(!output.contains("== Alerts =="));
        assert!(!dir.path().join("role").exists());
    }

    #[tokio::test]
    async fn test_help_lists_commands_and_redraws_the_section() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_script("packages\nhelp\nquit\n", &dir).await;

        let (_, after_help) = output.split_once(HELP).unwrap();
        assert!(after_help.starts_with("== Packages =="));
        assert!(after_help.contains("Filters (status): all"));
    }

    #[tokio::test]
    async fn test_palette_reaches_the_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let plain = run_script("alerts\nquit\n", &dir).await;
        assert!(!plain.contains('\x1b'));

        let coloured = run_script_with("alerts\nquit\n", &dir, Palette::Ansi).await;
        assert!(coloured.contains("\x1b[31m[high]\x1b[0m"));
    }
}
