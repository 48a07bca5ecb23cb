//! surveykit CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "surveykit", version, about = "Author, answer and evaluate surveys")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check survey files against the publish rules
    Validate {
        /// Path to a .toml survey file or directory
        #[arg(long)]
        survey: PathBuf,
    },

    /// Publish and answer a survey offline, printing the resulting response
    Preview {
        /// Path to a .toml survey file
        #[arg(long)]
        survey: PathBuf,

        /// Answer file to fill the survey with
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Print only the submitted answers as JSON
        #[arg(long)]
        json: bool,
    },

    /// Publish a survey file to the backend
    Publish {
        /// Path to a .toml survey file
        #[arg(long)]
        survey: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Delete a published survey
    Delete {
        /// Survey id
        #[arg(long)]
        id: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List every published survey
    List {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show assigned and completed surveys
    Dashboard {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Answer a survey from an answer file and submit it
    Answer {
        /// Survey id
        #[arg(long)]
        survey_id: String,

        /// Answer file
        #[arg(long)]
        answers: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show your submitted responses
    MyAnswers {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Review the responses of a user
    Responses {
        /// User id
        #[arg(long)]
        user: String,

        /// Only show responses without an evaluation
        #[arg(long)]
        pending: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Attach an evaluation to a response
    Evaluate {
        /// Response id
        #[arg(long)]
        response: String,

        /// Evaluation text
        #[arg(long)]
        text: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example survey
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("surveykit=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { survey } => commands::validate::execute(survey),
        Commands::Preview {
            survey,
            answers,
            json,
        } => commands::preview::execute(survey, answers, json).await,
        Commands::Publish { survey, config } => commands::manage::publish(survey, config).await,
        Commands::Delete { id, config } => commands::manage::delete(id, config).await,
        Commands::List { config } => commands::manage::list(config).await,
        Commands::Dashboard { config } => commands::dashboard::execute(config).await,
        Commands::Answer {
            survey_id,
            answers,
            config,
        } => commands::answer::execute(survey_id, answers, config).await,
        Commands::MyAnswers { config } => commands::responses::mine(config).await,
        Commands::Responses {
            user,
            pending,
            config,
        } => commands::responses::for_user(user, pending, config).await,
        Commands::Evaluate {
            response,
            text,
            config,
        } => commands::evaluate::execute(response, text, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
