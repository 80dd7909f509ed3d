//! CLI tool for extracting slides from documents and enhancing slide text.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use deck_client::{
    BackendClient, ClientConfig, EnhanceRequest, Enhancer, OpenAiClient, Simulator,
};
use deck_core::format::blocks_to_annotated;
use deck_core::{
    Block, ContentFormatter, DocumentExtractor, EnhancementHistory, EnhancementOptions,
    EnhancementType, JsonFileStore, Presentation, PresentationStore, SlideSegmenter,
};
use deck_office::OfficeReader;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extract slides from documents and rewrite them with AI.
#[derive(Parser, Debug)]
#[command(name = "deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Store file holding presentations and settings
    #[arg(long, global = true, env = "DECK_STORE", default_value = ".deck/store.json")]
    store: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract slides from .ppt, .pptx, .doc or .docx files and save them
    Extract {
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Print the presentation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Split a plain text file into annotated slide texts
    Segments {
        input: PathBuf,

        /// Print the raw segments, before titles and bullets are added
        #[arg(long)]
        raw: bool,
    },

    /// Render annotated slide text ("-" reads stdin)
    Render {
        input: PathBuf,

        /// Print blocks as JSON
        #[arg(long)]
        json: bool,
    },

    /// List saved presentations
    List,

    /// Show the slides of a saved presentation
    Show { id: String },

    /// Rewrite one slide
    Enhance {
        /// Presentation id
        id: String,

        /// Slide id (1-based)
        slide: usize,

        /// Enhancement type; repeat to apply several in sequence
        #[arg(short = 't', long = "type", required = true)]
        kinds: Vec<EnhancementType>,

        /// Tone intensity, 1 to 10
        #[arg(long, default_value = "5")]
        tone: u8,

        /// Target audience
        #[arg(long, default_value = "")]
        audience: String,

        /// Additional instructions
        #[arg(long, default_value = "")]
        instructions: String,

        /// Where to send the request
        #[arg(long, value_enum, default_value = "openai")]
        via: Provider,

        #[command(flatten)]
        backend: BackendArgs,

        /// Step back this many results before printing
        #[arg(long, default_value = "0")]
        undo: usize,

        /// Save the final result into the slide
        #[arg(long)]
        apply: bool,
    },

    /// Upload a file to the backend for server-side extraction
    Upload {
        input: PathBuf,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Check whether the backend is reachable
    Health {
        #[command(flatten)]
        backend: BackendArgs,

        /// Keep polling and report every change
        #[arg(long)]
        watch: bool,
    },

    /// Manage provider settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
struct BackendArgs {
    /// Backend base URL
    #[arg(long, env = "DECK_BACKEND_URL", default_value = deck_client::config::DEFAULT_BACKEND_URL)]
    backend: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

impl BackendArgs {
    fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.backend).with_request_timeout(Duration::from_secs(self.timeout))
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Provider {
    Openai,
    Backend,
    Simulate,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    SetKey { value: String },
    SetModel { value: String },
    SetPrompt { value: String },
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut store = JsonFileStore::new(&args.store);

    match &args.command {
        Command::Extract { input, json } => extract_files(input, *json, &mut store).await,
        Command::Segments { input, raw } => print_segments(input, *raw),
        Command::Render { input, json } => render_file(input, *json),
        Command::List => list_presentations(&store),
        Command::Show { id } => show_presentation(&store, id),
        Command::Enhance {
            id,
            slide,
            kinds,
            tone,
            audience,
            instructions,
            via,
            backend,
            undo,
            apply,
        } => {
            let options = EnhancementOptions::default()
                .with_tone_level(*tone)
                .with_target_audience(audience.as_str())
                .with_custom_instructions(instructions.as_str());
            let enhancer = build_enhancer(*via, backend, &store)?;
            enhance_slide(&mut store, enhancer.as_ref(), id, *slide, kinds, options, *undo, *apply).await
        }
        Command::Upload { input, backend } => upload_file(input, backend, &mut store).await,
        Command::Health { backend, watch } => check_health(backend, *watch).await,
        Command::Config { action } => configure(&mut store, action),
    }
}

/// Extract each file, save it and print a summary.
async fn extract_files(inputs: &[PathBuf], json: bool, store: &mut JsonFileStore) -> Result<()> {
    let extractor = DocumentExtractor::new(OfficeReader::new());

    for input_path in inputs {
        log::debug!("Processing: {}", input_path.display());

        match extractor.extract(input_path).await {
            Ok(presentation) => {
                store
                    .save_presentation(&presentation)
                    .context("Failed to save presentation")?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&presentation)?);
                } else {
                    print_summary(&presentation);
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {}", input_path.display(), e);
            }
        }
    }

    Ok(())
}

fn print_summary(presentation: &Presentation) {
    println!(
        "{}  {}  ({} slides)",
        presentation.id,
        presentation.name,
        presentation.slides.len()
    );
    for slide in &presentation.slides {
        println!("  {:>3}. {}", slide.id, slide.title);
    }
}

fn print_segments(input: &Path, raw: bool) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("{}", segments_output(&text, raw));
    Ok(())
}

/// Segments separated by `---` lines.
fn segments_output(text: &str, raw: bool) -> String {
    let segmenter = SlideSegmenter::default();
    let segments = if raw {
        segmenter.split_raw(text)
    } else {
        segmenter.segment(text)
    };
    segments.join("\n---\n")
}

fn render_file(input: &Path, json: bool) -> Result<()> {
    let content = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };

    let blocks = ContentFormatter::new().render_for_display(&content);
    if json {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
    } else {
        print_blocks(&blocks);
    }
    Ok(())
}

fn print_blocks(blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Heading(text) => println!("# {}", text),
            Block::List(items) => {
                for item in items {
                    println!("  - {}", item);
                }
            }
            Block::Paragraph(text) => println!("{}", text),
        }
    }
}

fn list_presentations(store: &JsonFileStore) -> Result<()> {
    let presentations = store.load_all().context("Failed to load presentations")?;
    if presentations.is_empty() {
        println!("No saved presentations in {}", store.path().display());
    }
    for presentation in &presentations {
        println!(
            "{}  {}  ({} slides)",
            presentation.id,
            presentation.name,
            presentation.slides.len()
        );
    }
    Ok(())
}

fn load_presentation(store: &JsonFileStore, id: &str) -> Result<Presentation> {
    Ok(store.require_presentation(id)?)
}

fn show_presentation(store: &JsonFileStore, id: &str) -> Result<()> {
    let presentation = load_presentation(store, id)?;
    println!("{}", presentation.name);
    for slide in &presentation.slides {
        println!("\n[{}] {}", slide.id, slide.title);
        print_blocks(&ContentFormatter::new().render_for_display(&slide.content));
    }
    Ok(())
}

fn build_enhancer(
    via: Provider,
    backend: &BackendArgs,
    store: &JsonFileStore,
) -> Result<Box<dyn Enhancer>> {
    let settings = store.settings().context("Failed to load settings")?;
    let config = backend.client_config();

    let enhancer: Box<dyn Enhancer> = match via {
        Provider::Openai => Box::new(OpenAiClient::new(settings, &config)?),
        Provider::Backend => Box::new(BackendClient::new(config)?.with_settings(settings)),
        Provider::Simulate => Box::new(Simulator),
    };
    Ok(enhancer)
}

/// Run one edit session: apply each enhancement in turn, then step back.
#[allow(clippy::too_many_arguments)]
async fn enhance_slide(
    store: &mut JsonFileStore,
    enhancer: &dyn Enhancer,
    id: &str,
    slide_id: usize,
    kinds: &[EnhancementType],
    options: EnhancementOptions,
    undo: usize,
    apply: bool,
) -> Result<()> {
    options.validate()?;
    let presentation = load_presentation(store, id)?;
    let Some(slide) = presentation.slide(slide_id) else {
        bail!("Slide {} not found in {}", slide_id, id);
    };

    let mut history = EnhancementHistory::new(slide.content.clone());
    for kind in kinds {
        let request = EnhanceRequest::new(slide_id - 1, history.current(), *kind)
            .with_options(options.clone());
        let enhanced = enhancer
            .enhance(&request)
            .await
            .with_context(|| format!("Enhancement '{}' failed", kind))?;
        history.push(enhanced);
    }
    for _ in 0..undo {
        if history.undo().is_none() {
            break;
        }
    }

    let result = history.current().to_string();
    println!("{}", blocks_to_annotated(&ContentFormatter::new().render_for_display(&result)));

    if apply {
        store
            .update_slide(id, slide_id, &result)
            .context("Failed to save slide")?;
        eprintln!("Saved slide {} ({} of {} versions)", slide_id, history.index() + 1, history.len());
    }
    Ok(())
}

async fn upload_file(input: &Path, backend: &BackendArgs, store: &mut JsonFileStore) -> Result<()> {
    let client = BackendClient::new(backend.client_config())?;
    let response = client
        .upload(input)
        .await
        .with_context(|| format!("Failed to upload {}", input.display()))?;

    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .map(deck_core::types::strip_extension)
        .unwrap_or("upload")
        .to_string();
    let presentation = response.into_presentation(name);
    store
        .save_presentation(&presentation)
        .context("Failed to save presentation")?;
    print_summary(&presentation);
    Ok(())
}

async fn check_health(backend: &BackendArgs, watch: bool) -> Result<()> {
    let client = BackendClient::new(backend.client_config())?;

    if !watch {
        if client.health().await {
            println!("Backend reachable at {}", backend.backend);
            return Ok(());
        }
        bail!("Backend unreachable at {}", backend.backend);
    }

    let monitor = deck_client::HealthMonitor::spawn(client);
    let mut updates = monitor.subscribe();
    println!("Watching {} (Ctrl-C to stop)", backend.backend);
    while updates.changed().await.is_ok() {
        if let Some(reachable) = *updates.borrow_and_update() {
            println!("{}", status_label(reachable));
        }
    }
    Ok(())
}

fn status_label(reachable: bool) -> &'static str {
    if reachable {
        "reachable"
    } else {
        "unreachable"
    }
}

fn configure(store: &mut JsonFileStore, action: &ConfigAction) -> Result<()> {
    let mut settings = store.settings().context("Failed to load settings")?;
    match action {
        ConfigAction::SetKey { value } => settings.api_key = value.clone(),
        ConfigAction::SetModel { value } => settings.model = value.clone(),
        ConfigAction::SetPrompt { value } => settings.default_prompt = value.clone(),
        ConfigAction::Show => {
            let masked = if settings.has_api_key() { "set" } else { "not set" };
            println!("api key:        {}", masked);
            println!("model:          {}", settings.model);
            println!("default prompt: {}", settings.default_prompt);
            return Ok(());
        }
    }
    store.save_settings(&settings).context("Failed to save settings")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_enhance() {
        let args = Args::try_parse_from([
            "deck", "enhance", "123", "2", "-t", "concise", "-t", "creative", "--via", "simulate",
            "--undo", "1",
        ])
        .unwrap();

        match args.command {
            Command::Enhance { kinds, via, undo, slide, .. } => {
                assert_eq!(kinds, vec![EnhancementType::Concise, EnhancementType::Creative]);
                assert_eq!(via, Provider::Simulate);
                assert_eq!(undo, 1);
                assert_eq!(slide, 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_segments_output_raw_and_annotated() {
        let text = "Slide 1\nHello\n\nSlide 2\nWorld";
        assert_eq!(segments_output(text, true), "Hello\n---\nWorld");
        assert_eq!(segments_output(text, false), "Title: Hello\n---\nTitle: World");
    }

    #[test]
    fn test_args_parse_segments_raw() {
        let args = Args::try_parse_from(["deck", "segments", "notes.txt", "--raw"]).unwrap();
        assert!(matches!(args.command, Command::Segments { raw: true, .. }));
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(true), "reachable");
        assert_eq!(status_label(false), "unreachable");
    }

    #[test]
    fn test_args_reject_unknown_type() {
        assert!(Args::try_parse_from(["deck", "enhance", "1", "1", "-t", "poetic"]).is_err());
    }

    #[tokio::test]
    async fn test_enhance_session_applies_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("store.json"));
        let mut presentation = Presentation::with_id("7", "Demo");
        presentation.push_slide("Intro", "Title: Intro");
        store.save_presentation(&presentation).unwrap();

        enhance_slide(
            &mut store,
            &Simulator,
            "7",
            1,
            &[EnhancementType::Concise, EnhancementType::Elaborate],
            EnhancementOptions::default(),
            1,
            true,
        )
        .await
        .unwrap();

        let saved = store.get_presentation("7").unwrap().unwrap();
        let expected = deck_core::enhance::simulate(EnhancementType::Concise, "Title: Intro");
        assert_eq!(saved.slides[0].content, expected);
    }

    #[tokio::test]
    async fn test_enhance_missing_slide() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("store.json"));
        store.save_presentation(&Presentation::with_id("7", "Demo")).unwrap();

        let result = enhance_slide(
            &mut store,
            &Simulator,
            "7",
            3,
            &[EnhancementType::Concise],
            EnhancementOptions::default(),
            0,
            false,
        )
        .await;
        assert!(result.is_err());
    }
}
