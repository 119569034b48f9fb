use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use facetobj_base::{DEFAULT_TESSELLATION_TOLERANCE, ExportOptions, LengthUnit, Material, Rgb};
use facetobj_io::{ExportSession, ExportSummary};
use facetobj_model::{Category, CategoryMaterials, Element, Point3, Scene, Vector3, box_solid};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "facetobj")]
#[command(about = "Export triangulated building elements to OBJ + MTL")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export every element of a JSON scene.
    Scene(SceneArgs),
    /// Export a single colored box.
    Box(BoxArgs),
}

#[derive(Args)]
struct OutputArgs {
    #[arg(long)]
    out: PathBuf,
    /// Source length unit: ft, in, m or mm.
    #[arg(long)]
    unit: Option<LengthUnit>,
    /// Skip the material library and `usemtl` lines.
    #[arg(long)]
    no_colors: bool,
    #[arg(long, default_value_t = DEFAULT_TESSELLATION_TOLERANCE)]
    tolerance: f64,
}

#[derive(Args)]
struct SceneArgs {
    #[arg(long = "in")]
    input: PathBuf,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct BoxArgs {
    #[arg(long)]
    size: String,
    #[arg(long, default_value = "127,127,127")]
    color: String,
    #[arg(long, default_value_t = 0)]
    transparency: u8,
    #[arg(long)]
    name: Option<String>,
    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let summary = match cli.command {
        Command::Scene(args) => export_scene(args)?,
        Command::Box(args) => export_box(args)?,
    };
    println!("Export complete: {summary}");
    Ok(())
}

fn export_scene(args: SceneArgs) -> Result<ExportSummary> {
    let scene = Scene::load(&args.input)
        .with_context(|| format!("failed to load scene {}", args.input.display()))?;
    let elements = scene.build_elements().context("failed to build scene geometry")?;

    let options = export_options(&args.output, scene.unit);
    info!(
        input = %args.input.display(),
        elements = elements.len(),
        unit = %options.unit,
        "scene loaded"
    );

    let mut session = ExportSession::new(options, scene.categories);
    for element in &elements {
        session
            .add_element(element)
            .with_context(|| format!("failed to export element `{}`", element.name))?;
    }
    info!(
        materials = session.mesh().material_count(),
        "scene triangulated"
    );
    session.export(&args.output.out).context("OBJ export failed")
}

fn export_box(args: BoxArgs) -> Result<ExportSummary> {
    let (width, depth, height) = parse_triple::<f64>("--size", &args.size)?;
    let (r, g, b) = parse_triple::<u8>("--color", &args.color)?;
    let material = Material::new(Rgb::new(r, g, b), args.transparency)?;

    let solid = box_solid(Point3::new(0.0, 0.0, 0.0), Vector3::new(width, depth, height))
        .context("failed to build box solid")?;
    let name = args.name.unwrap_or_else(|| "Box".to_string());
    let element = Element::new(name, Category::Generic)
        .with_material(material)
        .with_solid(solid);

    let options = export_options(&args.output, None);
    let mut session = ExportSession::new(options, CategoryMaterials::new());
    session.add_element(&element)?;
    session.export(&args.output.out).context("OBJ export failed")
}

fn export_options(args: &OutputArgs, scene_unit: Option<LengthUnit>) -> ExportOptions {
    let defaults = ExportOptions::default();
    ExportOptions {
        unit: args.unit.or(scene_unit).unwrap_or(defaults.unit),
        export_colors: !args.no_colors,
        tessellation_tolerance: args.tolerance,
    }
}

fn parse_triple<T>(flag: &str, text: &str) -> Result<(T, T, T)>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        bail!("{flag} expects three comma-separated values, e.g. 10,20,30");
    }

    let first = parts[0].trim().parse().with_context(|| format!("invalid {flag}"))?;
    let second = parts[1].trim().parse().with_context(|| format!("invalid {flag}"))?;
    let third = parts[2].trim().parse().with_context(|| format!("invalid {flag}"))?;
    Ok((first, second, third))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
