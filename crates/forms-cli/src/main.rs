mod sample;

use clap::{Args, Parser, Subcommand};
use forms_api::{
    AuthProvider, FormOrchestrator, FormResult, FormsService, GoogleFormsClient, InstalledAppAuth,
    StaticToken, plan_creation,
};
use forms_spec::{ConfigError, FormConfig, PlaceholderPolicy, config_schema, load_config};
use log::{debug, info};
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const DEFAULT_CONFIG: &str = "form_config.json";
const DEFAULT_CLIENT_SECRETS: &str = "client_secrets.json";
const DEFAULT_TOKEN_FILE: &str = "token.json";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Create Google Forms from JSON configuration",
    long_about = "Turns a JSON description of a survey or quiz into a live Google Form"
)]
struct Cli {
    /// Log progress of each remote call (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a form on the remote service.
    Create {
        /// Path to the form configuration JSON.
        #[arg(long, value_name = "CONFIG", default_value = DEFAULT_CONFIG)]
        config: PathBuf,
        /// OAuth client secrets (defaults to FORMS_CLIENT_SECRETS or client_secrets.json).
        #[arg(long, value_name = "PATH")]
        client_secrets: Option<PathBuf>,
        /// Where the authorized token is kept between runs (defaults to FORMS_TOKEN_FILE or token.json).
        #[arg(long, value_name = "PATH")]
        token_file: Option<PathBuf>,
        /// Use this access token instead of the OAuth flow (defaults to FORMS_ACCESS_TOKEN).
        #[arg(long, value_name = "TOKEN")]
        access_token: Option<String>,
        #[command(flatten)]
        placeholders: PlaceholderArgs,
    },
    /// Print the requests a `create` run would send, without sending them.
    Preview {
        /// Path to the form configuration JSON.
        #[arg(long, value_name = "CONFIG", default_value = DEFAULT_CONFIG)]
        config: PathBuf,
        #[command(flatten)]
        placeholders: PlaceholderArgs,
    },
    /// Print a sample configuration to start from.
    Sample {
        /// Emit a graded quiz instead of a survey.
        #[arg(long)]
        quiz: bool,
    },
    /// Print the JSON Schema of the configuration format.
    Schema,
}

#[derive(Args)]
struct PlaceholderArgs {
    /// Placeholder image URL (repeatable). Its origin counts as placeholder too.
    #[arg(long = "placeholder-url", value_name = "URL")]
    placeholder_urls: Vec<String>,
    /// Forward every image URL, including the default placeholder.
    #[arg(long, conflicts_with = "placeholder_urls")]
    no_placeholders: bool,
}

impl PlaceholderArgs {
    fn policy(&self) -> PlaceholderPolicy {
        if self.no_placeholders {
            PlaceholderPolicy::disabled()
        } else if self.placeholder_urls.is_empty() {
            PlaceholderPolicy::default()
        } else {
            PlaceholderPolicy::new(self.placeholder_urls.iter().cloned())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&*err),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(command: Command) -> CliResult<()> {
    match command {
        Command::Create {
            config,
            client_secrets,
            token_file,
            access_token,
            placeholders,
        } => run_create(
            &config,
            auth_provider(client_secrets, token_file, access_token)?,
            placeholders.policy(),
        ),
        Command::Preview {
            config,
            placeholders,
        } => run_preview(&config, placeholders.policy()),
        Command::Sample { quiz } => {
            let sample = if quiz { sample::quiz() } else { sample::survey() };
            print_json(&sample)
        }
        Command::Schema => print_json(&config_schema()?),
    }
}

fn report_failure(err: &(dyn std::error::Error + 'static)) -> ExitCode {
    if let Some(ConfigError::NotFound(path)) = err.downcast_ref::<ConfigError>() {
        println!(
            "Error: {} not found. Please ensure the file exists.",
            path.display()
        );
        println!("Run `form-builder sample > {}` to start from an example.", DEFAULT_CONFIG);
        return ExitCode::SUCCESS;
    }
    eprintln!("An error occurred: {}", err);
    eprintln!("Please check your credentials and API permissions.");
    ExitCode::FAILURE
}

fn auth_provider(
    client_secrets: Option<PathBuf>,
    token_file: Option<PathBuf>,
    access_token: Option<String>,
) -> CliResult<Box<dyn AuthProvider>> {
    let access_token = access_token.or_else(|| {
        env::var("FORMS_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
    });
    if let Some(token) = access_token {
        debug!("using access token supplied on the command line or environment");
        return Ok(Box::new(StaticToken::new(token)));
    }

    let client_secrets =
        path_or_env(client_secrets, "FORMS_CLIENT_SECRETS", DEFAULT_CLIENT_SECRETS);
    let token_file = path_or_env(token_file, "FORMS_TOKEN_FILE", DEFAULT_TOKEN_FILE);
    debug!(
        "using OAuth client {} with token file {}",
        client_secrets.display(),
        token_file.display()
    );
    Ok(Box::new(InstalledAppAuth::new(client_secrets, token_file)?))
}

fn path_or_env(value: Option<PathBuf>, key: &str, fallback: &str) -> PathBuf {
    value
        .or_else(|| env::var_os(key).map(PathBuf::from))
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(fallback))
}

fn run_create(
    config_path: &Path,
    auth: Box<dyn AuthProvider>,
    placeholders: PlaceholderPolicy,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    info!(
        "loaded {} question(s) from {}",
        config.questions.len(),
        config_path.display()
    );
    let client = GoogleFormsClient::new(auth)?;
    let result = create_form(&client, &config, placeholders)?;
    describe_result(&result);
    Ok(())
}

fn create_form<S: FormsService>(
    service: S,
    config: &FormConfig,
    placeholders: PlaceholderPolicy,
) -> CliResult<FormResult> {
    let orchestrator = FormOrchestrator::new(service).with_placeholders(placeholders);
    Ok(orchestrator.create(config)?)
}

fn describe_result(result: &FormResult) {
    println!("Form created successfully!");
    println!("Form ID: {}", result.form_id);
    println!("Responder URL: {}", result.responder_uri);
    println!("Edit URL: {}", result.edit_uri);
}

fn run_preview(config_path: &Path, placeholders: PlaceholderPolicy) -> CliResult<()> {
    let config = load_config(config_path)?;
    let plan = plan_creation(&config, &placeholders)?;
    print_json(&serde_json::to_value(&plan)?)
}

fn print_json(value: &Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
