//! CLI for Mockup Studio - AI image editing, mockups, and generation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use mockup_studio::image::{GeminiClient, GeminiModel, ImageGenerator, ImagenModel, ModelRoutes};
use mockup_studio::studio::{ImageSlot, ProductSource, Studio, Workflow};
use mockup_studio::GeneratedImage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mockup-studio")]
#[command(about = "Edit images, build product mockups, and generate images via Gemini and Imagen")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Image-editing model (edit and mockup)
    #[arg(long, global = true, value_enum, default_value = "nano-banana")]
    edit_model: EditModelArg,

    /// Image-generation model (generate)
    #[arg(long, global = true, value_enum, default_value = "imagen4")]
    generate_model: GenerateModelArg,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit an image with a text instruction
    Edit(EditArgs),

    /// Place a logo onto a described or uploaded product
    Mockup(MockupArgs),

    /// Generate an image from a text prompt
    Generate(GenerateArgs),

    /// List models, optionally checking that they are reachable
    Models {
        /// Call the API to verify the key and each model
        #[arg(long)]
        check: bool,
    },
}

#[derive(Args)]
struct EditArgs {
    /// Image to edit
    #[arg(short, long)]
    image: PathBuf,

    /// How to change the image
    #[arg(short, long)]
    prompt: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct MockupArgs {
    /// Logo image
    #[arg(short, long)]
    logo: PathBuf,

    /// Product description (e.g. "a black coffee mug")
    #[arg(long, conflicts_with = "subject")]
    product: Option<String>,

    /// Product image to place the logo onto
    #[arg(long)]
    subject: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the image
    prompt: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EditModelArg {
    NanoBanana,
    NanoBananaPro,
}

impl From<EditModelArg> for GeminiModel {
    fn from(arg: EditModelArg) -> Self {
        match arg {
            EditModelArg::NanoBanana => GeminiModel::NanoBanana,
            EditModelArg::NanoBananaPro => GeminiModel::NanoBananaPro,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GenerateModelArg {
    Imagen4,
    Imagen4Fast,
    Imagen4Ultra,
}

impl From<GenerateModelArg> for ImagenModel {
    fn from(arg: GenerateModelArg) -> Self {
        match arg {
            GenerateModelArg::Imagen4 => ImagenModel::Imagen4,
            GenerateModelArg::Imagen4Fast => ImagenModel::Imagen4Fast,
            GenerateModelArg::Imagen4Ultra => ImagenModel::Imagen4Ultra,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let routes = ModelRoutes {
        editing: cli.edit_model.into(),
        generation: cli.generate_model.into(),
    };

    match cli.command {
        Commands::Models { check } => list_models(routes, check, cli.json).await,
        command => {
            let client = GeminiClient::builder().build()?;
            let mut studio = Studio::new(ImageGenerator::with_routes(client, routes));
            let output = prepare(&mut studio, command)?;
            let image = studio.submit().await?;
            report(&image, &output, cli.json)
        }
    }
}

/// Fills the matching tab's inputs and returns the output path.
fn prepare(studio: &mut Studio<GeminiClient>, command: Commands) -> anyhow::Result<PathBuf> {
    let state = studio.state_mut();
    match command {
        Commands::Edit(args) => {
            state.switch_to(Workflow::Editor);
            state.upload(ImageSlot::EditorImage, &args.image)?;
            if let Some(inputs) = state.editor_mut() {
                inputs.instruction = args.prompt;
            }
            Ok(args.output)
        }
        Commands::Mockup(args) => {
            state.switch_to(Workflow::Mockup);
            state.upload(ImageSlot::Logo, &args.logo)?;
            if let Some(subject) = &args.subject {
                state.upload(ImageSlot::Subject, subject)?;
            }
            if let Some(inputs) = state.mockup_mut() {
                if args.subject.is_some() {
                    inputs.source = ProductSource::Image;
                } else if let Some(product) = args.product {
                    inputs.product_description = product;
                }
            }
            Ok(args.output)
        }
        Commands::Generate(args) => {
            state.switch_to(Workflow::Generator);
            if let Some(inputs) = state.generator_mut() {
                inputs.prompt = args.prompt;
            }
            Ok(args.output)
        }
        Commands::Models { .. } => anyhow::bail!("models does not produce an image"),
    }
}

fn report(image: &GeneratedImage, output: &Path, json_output: bool) -> anyhow::Result<()> {
    let size = image.save(output)?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "output": output.display().to_string(),
            "size_bytes": size,
            "media_type": image.display_media_type(),
            "model": image.metadata.model,
            "duration_ms": image.metadata.duration_ms,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Saved image: {} ({} bytes)", output.display(), size);
        if let Some(model) = &image.metadata.model {
            println!("Model: {}", model);
        }
        if let Some(duration) = image.metadata.duration_ms {
            println!("Duration: {}ms", duration);
        }
    }

    Ok(())
}

async fn list_models(routes: ModelRoutes, check: bool, json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct ModelInfo {
        family: &'static str,
        model: &'static str,
        workflows: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        reachable: Option<bool>,
    }

    let mut models = vec![
        ModelInfo {
            family: "image-editing",
            model: routes.editing.as_str(),
            workflows: "edit, mockup",
            reachable: None,
        },
        ModelInfo {
            family: "image-generation",
            model: routes.generation.as_str(),
            workflows: "generate",
            reachable: None,
        },
    ];

    if check {
        let client = GeminiClient::builder().build()?;
        for info in &mut models {
            let result = client.health_check(info.model).await;
            if let Err(e) = &result {
                tracing::warn!(model = info.model, "health check failed: {e}");
            }
            info.reachable = Some(result.is_ok());
        }
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&models)?);
    } else {
        for m in &models {
            let status = match m.reachable {
                Some(true) => "✓ ",
                Some(false) => "✗ ",
                None => "",
            };
            println!("{}{} ({})", status, m.model, m.family);
            println!("    workflows: {}", m.workflows);
        }
    }

    Ok(())
}
