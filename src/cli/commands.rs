use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

use crate::{
    api::{HttpTransport, Transport},
    app::{init_config, Config},
    tokens::TokenManager,
    upload::{LinkNavigator, UploadController, UploadMode, Uploaded, TEXT_CONTENT_TYPES},
};

use super::{Commands, TokenCommands};

/// Handle CLI subcommands
///
/// Returns `false` when the interactive form should open instead.
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Ui => Ok(false),
        Commands::Upload { path } => {
            upload_file(path, config).await?;
            Ok(true)
        }
        Commands::Paste { ext, name } => {
            paste_stdin(ext.as_deref(), name.as_deref(), config).await?;
            Ok(true)
        }
        Commands::Token(command) => {
            handle_token_command(command, config).await?;
            Ok(true)
        }
        Commands::Init => {
            let (path, created) = init_config()?;
            if created {
                println!("Configuration written to {}", path.display().to_string().green());
            } else {
                println!("Configuration already exists at {}", path.display());
            }
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
    }
}

/// Build the transport for the configured server
pub fn connect(config: &Config) -> Result<Arc<dyn Transport>> {
    let transport = HttpTransport::new(&config.server, &config.http)?;
    Ok(Arc::new(transport))
}

/// Show version information
pub fn show_version() {
    println!("tempfiles v{}", env!("CARGO_PKG_VERSION"));
    println!("   Upload files and text snippets to a tempfiles server");
}

async fn upload_file(path: &Path, config: &Config) -> Result<()> {
    let transport = connect(config)?;
    let mut controller =
        UploadController::new(LinkNavigator::default(), &config.ui.default_extension);
    controller.select_files(vec![path.to_path_buf()]);
    submit(&mut controller, transport.as_ref()).await
}

async fn paste_stdin(ext: Option<&str>, name: Option<&str>, config: &Config) -> Result<()> {
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;

    let transport = connect(config)?;
    let mut controller =
        UploadController::new(LinkNavigator::default(), &config.ui.default_extension);
    controller.switch_mode(UploadMode::Text);
    if let Some(ext) = ext {
        if !controller.set_extension(ext) {
            let known: Vec<&str> = TEXT_CONTENT_TYPES.iter().map(|(ext, _)| *ext).collect();
            bail!("Unsupported extension '{}'. Choose one of: {}", ext, known.join(", "));
        }
    }
    if let Some(name) = name {
        controller.set_custom_name(name);
    }
    controller.set_text(text);

    if let Some(preview) = controller.text_preview().get() {
        eprintln!("{}", preview.header().dimmed());
    }
    submit(&mut controller, transport.as_ref()).await
}

async fn submit(
    controller: &mut UploadController<LinkNavigator>,
    transport: &dyn Transport,
) -> Result<()> {
    match controller.submit(transport).await {
        Some(Ok(uploaded)) => {
            print_upload(&uploaded);
            Ok(())
        }
        Some(Err(e)) => Err(e.into()),
        None => Err(anyhow!(controller
            .status()
            .unwrap_or("Nothing to upload.")
            .to_string())),
    }
}

/// Print the link of a finished upload followed by the details the server sent
pub fn print_upload(uploaded: &Uploaded) {
    println!("{}", uploaded.frontend_url.green().bold());
    for line in upload_details(uploaded) {
        println!("{}", line);
    }
}

fn upload_details(uploaded: &Uploaded) -> Vec<String> {
    uploaded
        .info
        .extras()
        .into_iter()
        .map(|(label, value)| format!("  {:<5} {}", format!("{}:", label), value))
        .collect()
}

async fn handle_token_command(command: &TokenCommands, config: &Config) -> Result<()> {
    let manager = TokenManager::new(connect(config)?);

    match command {
        TokenCommands::Create { name, duration } => {
            let issued = manager.create(name, *duration).await?;
            println!("Token \"{}\" created.", name);
            println!("{}", issued.token.unwrap_or_default().bold());
            if let Some(expires) = issued.time_expiration {
                println!("Expires: {}", format_timestamp(&expires));
            }
            println!("{}", "Copy it now, it will not be shown again.".yellow());
        }
        TokenCommands::Delete { name, yes } => {
            let question = format!(
                "Are you sure you want to delete token \"{}\"? {} [y/N] ",
                name, "This action cannot be undone."
            );
            if !confirmed(*yes, || confirm(&question), name)? {
                println!("Aborted.");
                return Ok(());
            }
            manager.delete(name).await?;
            println!("Token \"{}\" deleted.", name);
        }
        TokenCommands::Whoami => {
            let identity = manager.whoami().await?;
            if identity.authenticated {
                println!("{} <{}>", identity.name.bold(), identity.email);
                println!("  id:   {}", identity.id);
                println!("  kind: {}", identity.user_kind);
            } else {
                println!("{}", "Not logged in.".yellow());
            }
        }
    }

    Ok(())
}

/// Server timestamps in local time; anything unparseable is shown as sent
fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

/// Whether a destructive command may go ahead
///
/// `--yes` skips the prompt; without it a terminal must be there to answer.
fn confirmed(yes: bool, ask: impl FnOnce() -> Option<bool>, name: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    ask().ok_or_else(|| {
        anyhow!(
            "Refusing to delete token \"{}\" without confirmation; pass --yes to skip the prompt",
            name
        )
    })
}

/// Ask a yes/no question on the controlling terminal; `None` without one
fn confirm(question: &str) -> Option<bool> {
    let tty = std::fs::File::open("/dev/tty").ok()?;
    eprint!("{}", question);
    let mut answer = String::new();
    io::BufReader::new(tty).read_line(&mut answer).ok()?;
    Some(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y" | "yes" | "Yes" | "YES")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HttpReply, MockTransport, UploadInfo};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" yes "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_delete_needs_yes_without_terminal() {
        let err = confirmed(false, || None, "deploy").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Refusing to delete token \"deploy\" without confirmation"));
        assert!(message.ends_with("pass --yes to skip the prompt"));
        assert!(confirmed(true, || unreachable!(), "deploy").unwrap());
        assert!(!confirmed(false, || Some(false), "deploy").unwrap());
        assert!(confirmed(false, || Some(true), "deploy").unwrap());
    }

    #[test]
    fn test_upload_details_list_present_extras() {
        let uploaded = Uploaded {
            frontend_url: "https://t/file/4/a.png".to_string(),
            info: UploadInfo {
                url_frontend: Some("https://t/file/4/a.png".to_string()),
                url_raw: Some("https://t/raw/4".to_string()),
                url_infos: Some(String::new()),
                name: Some("a.png".to_string()),
                content_type: None,
                fid: Some(4),
            },
        };
        assert_eq!(
            upload_details(&uploaded),
            vec![
                "  Name: a.png".to_string(),
                "  ID:   4".to_string(),
                "  Raw:  https://t/raw/4".to_string(),
            ]
        );

        let bare = Uploaded {
            frontend_url: "https://t/f".to_string(),
            info: UploadInfo::default(),
        };
        assert!(upload_details(&bare).is_empty());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("next tuesday"), "next tuesday");
        let formatted = format_timestamp("2026-10-26T12:00:00Z");
        assert!(formatted.starts_with("2026-10-2"));
        assert_eq!(formatted.len(), "2026-10-26 12:00".len());
    }

    #[test]
    fn test_connect_rejects_bad_server() {
        let mut config = Config::default();
        config.server.base_url = "::nonsense".to_string();
        assert!(connect(&config).is_err());
    }

    #[tokio::test]
    async fn test_submit_reports_link() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "hi").unwrap();

        let mut transport = MockTransport::new();
        transport.expect_upload_file().times(1).returning(|_| {
            Ok(HttpReply::json(200, &json!({"url_frontend": "https://t/f/1"})))
        });

        let mut controller = UploadController::new(LinkNavigator::default(), "txt");
        controller.select_files(vec![path]);
        submit(&mut controller, &transport).await.unwrap();
        assert_eq!(controller.navigator().destination(), Some("https://t/f/1"));
    }

    #[tokio::test]
    async fn test_submit_surfaces_validation_message() {
        let mut transport = MockTransport::new();
        transport.expect_upload_file().never();

        let mut controller = UploadController::new(LinkNavigator::default(), "txt");
        controller.switch_mode(UploadMode::Text);
        let err = submit(&mut controller, &transport).await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter some text to upload.");
    }

    #[tokio::test]
    async fn test_submit_surfaces_server_failure() {
        let mut transport = MockTransport::new();
        transport
            .expect_upload_file()
            .returning(|_| Ok(HttpReply::new(413, "too large")));

        let mut controller = UploadController::new(LinkNavigator::default(), "txt");
        controller.switch_mode(UploadMode::Text);
        controller.set_text("big");
        let err = submit(&mut controller, &transport).await.unwrap_err();
        assert_eq!(err.to_string(), "Upload failed (HTTP 413).");
    }
}
