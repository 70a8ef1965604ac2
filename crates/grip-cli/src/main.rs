use anyhow::Result;
use clap::{Parser, Subcommand};
use grip_analysis_client::{AnalysisClientFactory, HttpSessionClient};
use grip_cli::ask::run_ask;
use grip_cli::chat::{render_message, ChatCommand, ChatFlow, ChatShell};
use grip_cli::logging::{init_file_logger, parse_level, DEFAULT_LOG_FILE};
use grip_core::transcript::describe_failure;
use grip_core::{AnalysisSession, AnalysisTransport, ConfigOverrides, Document, GripConfig};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[clap(name = "grip", author, version, about = "Grip contract strategist client")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(
        long,
        short,
        help = "Configuration file (defaults to ./grip.yaml when present)"
    )]
    config: Option<PathBuf>,

    #[clap(long, help = "Analysis endpoint URL, e.g. http://127.0.0.1:8002/ask")]
    endpoint: Option<String>,

    #[clap(long, help = "Request timeout in seconds")]
    timeout: Option<u64>,

    #[clap(long, short)]
    log_level: Option<String>,

    #[clap(long, help = "Where to write logs (default: grip.log)")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question, uploading a contract first if one is given
    Ask {
        #[clap(long, short, help = "PDF contract to upload")]
        file: Option<PathBuf>,

        #[clap(long, help = "Continue a session issued by an earlier call")]
        session_id: Option<String>,

        question: Vec<String>,
    },
    /// Start an interactive contract-strategist chat
    Chat {
        #[clap(long, short, help = "PDF contract to upload before the first question")]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli).await?;

    let level = parse_level(cli.log_level.as_deref().unwrap_or(&config.logging.level));
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.logging.file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    init_file_logger(level, &log_file)?;

    let client = AnalysisClientFactory::create_http_client(&config);

    match cli.command {
        Commands::Ask {
            file,
            session_id,
            question,
        } => run_ask_command(client, file, session_id, question.join(" ")).await,
        Commands::Chat { file } => run_chat(client, file).await,
    }
}

async fn load_config(cli: &Cli) -> Result<GripConfig> {
    let overrides = ConfigOverrides {
        endpoint: cli.endpoint.clone(),
        timeout_secs: cli.timeout,
    };
    Ok(grip_core::load_config(cli.config.as_deref(), &overrides).await?)
}

async fn run_ask_command(
    client: HttpSessionClient,
    file: Option<PathBuf>,
    session_id: Option<String>,
    question: String,
) -> Result<()> {
    let mut client = match session_id {
        Some(id) => client.with_session(AnalysisSession::resume(id)),
        None => client,
    };

    let document = match file {
        Some(path) => Some(Document::from_path(&path).await?),
        None => None,
    };

    match run_ask(&mut client, document, &question).await {
        Ok(output) => {
            println!("{}", output.advice);
            if !output.sources.is_empty() {
                println!();
                println!("Sources Referenced:");
                for source in &output.sources {
                    println!("{}", source);
                }
            }
            eprintln!("{}", output.session_line());
            Ok(())
        }
        Err(err) => anyhow::bail!(describe_failure(&err)),
    }
}

async fn run_chat(client: HttpSessionClient, file: Option<PathBuf>) -> Result<()> {
    let mut shell = ChatShell::new(client).with_notifier(|notice| println!("{}", notice));
    let mut printed = print_new_messages(&shell, 0);

    if let Some(path) = file {
        shell
            .handle(ChatCommand::Upload {
                path,
                question: None,
            })
            .await;
        printed = print_new_messages(&shell, printed);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let flow = shell.handle_line(&line).await;
        printed = print_new_messages(&shell, printed);
        if flow == ChatFlow::Quit {
            break;
        }
    }

    log::info!("Chat ended after {} messages", shell.transcript().len());
    Ok(())
}

fn print_new_messages<T: AnalysisTransport>(shell: &ChatShell<T>, printed: usize) -> usize {
    let messages = shell.transcript().messages();
    for message in &messages[printed..] {
        println!("{}", render_message(message));
    }
    messages.len()
}
