//! Open Canvas - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use opencanvas::{
    assistant::{Assistant, AssistantForm, AssistantStore, SubmitOutcome},
    cli::{Args, AssistantsCommand, Commands, Verbosity},
    config::Config,
    doctor::Doctor,
    embeddings::OpenAiEmbeddings,
    llm,
    rag::{NodeConfig, RetrievalMode, RetrievalNode},
    repl::ChatSession,
    telemetry,
    types::{Artifact, ConversationState, Message},
    vector,
};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.clone())?;

    // Flags win over the config file's default
    let verbosity = if args.quiet || args.verbose > 0 {
        args.verbosity()
    } else {
        Verbosity::from_config(&config.telemetry.default_verbosity).unwrap_or(Verbosity::Normal)
    };
    telemetry::init(verbosity, config.telemetry.color_output);

    match &args.command {
        Commands::Assistants { action } => run_assistants(&args, &config, action).await?,
        Commands::Indexes => list_indexes(&config).await?,
        Commands::Ask {
            assistant,
            query,
            artifact,
            artifact_file,
            code,
            top_k,
        } => {
            let request = AskRequest {
                assistant_id: assistant,
                query,
                mode: artifact.map(RetrievalMode::from).unwrap_or_default(),
                artifact_file: artifact_file.as_deref(),
                code: code.as_deref(),
                top_k: *top_k,
            };
            ask(&args, &config, verbosity, request).await?;
        }
        Commands::Chat { assistant } => chat(&args, &config, assistant).await?,
        Commands::Doctor => run_doctor(config).await,
        Commands::Config => show_config(&args, &config)?,
    }

    Ok(())
}

fn open_store(config: &Config) -> Result<AssistantStore> {
    AssistantStore::new(config.assistants_dir()).context("Failed to open assistant store")
}

async fn run_assistants(args: &Args, config: &Config, action: &AssistantsCommand) -> Result<()> {
    let store = open_store(config)?;

    match action {
        AssistantsCommand::List => {
            let assistants = store.list(&args.user)?;
            if assistants.is_empty() {
                println!("No assistants yet. Create one with:");
                println!("  opencanvas assistants create --name <NAME> --index <INDEX>");
            }
            for assistant in assistants {
                print_summary(&assistant);
            }
        }
        AssistantsCommand::Show { id } => {
            let assistant = store.get(&args.user, id)?;
            println!("{}", serde_json::to_string_pretty(&assistant)?);
        }
        AssistantsCommand::Create {
            name,
            description,
            system_prompt,
            index,
            icon,
            color,
        } => {
            let mut form = AssistantForm::for_create();
            form.set_name(name.as_str());
            if let Some(description) = description {
                form.set_description(description.as_str());
            }
            if let Some(system_prompt) = system_prompt {
                form.set_system_prompt(system_prompt.as_str());
            }
            if let Some(icon) = icon {
                form.select_icon(icon.as_str());
            }
            if let Some(color) = color {
                form.set_icon_color(color);
            }
            if let Some(index) = index {
                bind_index(config, &mut form, index).await?;
            }

            let outcome = form.submit(Some(&args.user), &store).await;
            report_outcome(outcome)?;
        }
        AssistantsCommand::Edit {
            id,
            name,
            description,
            system_prompt,
            index,
            icon,
            color,
        } => {
            let existing = store.get(&args.user, id)?;
            let mut form = AssistantForm::for_edit(&existing);
            if let Some(name) = name {
                form.set_name(name.as_str());
            }
            if let Some(description) = description {
                form.set_description(description.as_str());
            }
            if let Some(system_prompt) = system_prompt {
                form.set_system_prompt(system_prompt.as_str());
            }
            if let Some(icon) = icon {
                form.select_icon(icon.as_str());
            }
            if let Some(color) = color {
                form.set_icon_color(color);
            }
            if let Some(index) = index {
                bind_index(config, &mut form, index).await?;
            }

            let outcome = form.submit(Some(&args.user), &store).await;
            report_outcome(outcome)?;
        }
        AssistantsCommand::Delete { id } => {
            store.delete(&args.user, id)?;
            println!("{} {}", "Deleted".green(), id);
        }
    }

    Ok(())
}

/// Load the provider's index list so the selection can be checked
async fn bind_index(config: &Config, form: &mut AssistantForm, index: &str) -> Result<()> {
    if !index.is_empty() {
        let provider = vector::connect(&config.vector)?;
        form.load_indexes(provider.as_ref()).await;
    }
    form.select_vector_index(index)?;
    Ok(())
}

fn report_outcome(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Saved {
            assistant,
            notification,
        } => {
            println!("{}", notification.title.green());
            print_summary(&assistant);
            Ok(())
        }
        SubmitOutcome::Invalid(message) => Err(anyhow::anyhow!(message)),
        SubmitOutcome::Rejected(notification) | SubmitOutcome::Failed(notification) => {
            match notification.description {
                Some(description) => Err(anyhow::anyhow!("{}: {}", notification.title, description)),
                None => Err(anyhow::anyhow!(notification.title)),
            }
        }
    }
}

fn print_summary(assistant: &Assistant) {
    let index = assistant.vector_index().unwrap_or("-");
    println!(
        "  {}  {}  [index: {}]",
        assistant.assistant_id.dimmed(),
        assistant.name.bold(),
        index.cyan()
    );
    if let Some(description) = &assistant.metadata.description {
        println!("      {}", description);
    }
}

async fn list_indexes(config: &Config) -> Result<()> {
    let provider = vector::connect(&config.vector)?;
    let indexes = provider
        .list_indexes()
        .await
        .context("Failed to fetch vector indexes")?;

    if indexes.is_empty() {
        println!("No vector indexes found.");
    } else {
        println!("Available indexes:");
        for index in indexes {
            println!("  • {}", index);
        }
    }
    Ok(())
}

fn build_node(config: &Config) -> Result<RetrievalNode> {
    let embedder = Arc::new(OpenAiEmbeddings::from_config(&config.embeddings)?);
    let index = vector::connect(&config.vector)?;
    let model = llm::connect(&config.llm)?;
    Ok(RetrievalNode::new(embedder, index, model))
}

/// One `ask` invocation
struct AskRequest<'a> {
    assistant_id: &'a str,
    query: &'a str,
    mode: RetrievalMode,
    artifact_file: Option<&'a Path>,
    code: Option<&'a str>,
    top_k: Option<usize>,
}

async fn ask(args: &Args, config: &Config, verbosity: Verbosity, request: AskRequest<'_>) -> Result<()> {
    let store = open_store(config)?;
    let assistant = store.get(&args.user, request.assistant_id)?;
    let node = build_node(config)?;
    let mode = request.mode;

    let mut node_config = NodeConfig::from_assistant(&assistant)
        .mode(mode)
        .top_k(request.top_k.unwrap_or(config.vector.top_k));
    if let Some(language) = request.code {
        node_config = node_config.code(language);
    }

    let mut state = ConversationState::from_messages(vec![Message::user(request.query)]);
    if let Some(path) = request.artifact_file {
        let artifact = Artifact::from_file(path)
            .with_context(|| format!("Failed to read artifact {}", path.display()))?;
        state.artifact = Some(artifact);
    }

    let spinner = verbosity.show_progress().then(ProgressBar::new_spinner);
    if let Some(pb) = &spinner {
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        pb.set_message(format!("Searching {}...", assistant.vector_index().unwrap_or("index")));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
    }

    let result = node.run(&state, &node_config).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let next = result?;

    match (&next.artifact, mode) {
        (Some(artifact), mode) if mode != RetrievalMode::Respond => {
            println!("{}\n", format!("# {}", artifact.title).bold());
            println!("{}", artifact.content);
        }
        _ => {
            if let Some(message) = next.last_message() {
                println!("{}", message.content);
            }
        }
    }
    Ok(())
}

async fn chat(args: &Args, config: &Config, assistant_id: &str) -> Result<()> {
    let store = open_store(config)?;
    let assistant = store.get(&args.user, assistant_id)?;
    let node = build_node(config)?;

    let history = config.state_dir().join("chat_history");
    let mut session = ChatSession::new(node, assistant, config.vector.top_k);
    session.run(Some(history)).await
}

async fn run_doctor(config: Config) {
    let doctor = Doctor::new(config);
    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    std::process::exit(if Doctor::all_passed(&checks) { 0 } else { 1 });
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    let source = match &args.config {
        Some(path) => path.display().to_string(),
        None => Config::default_path()
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string()),
    };

    println!("{} {}\n", "Configuration from".cyan(), source);
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
