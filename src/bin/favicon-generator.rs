use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use favicon_generator::{
    ContainerResolver, DarkModeStyle, FaviconGenerator, FaviconError, GenerationOptions, HeadTags,
    HexColor, SettingsDocument, SourceDescriptor, TextFont, TextWeight,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "favicon-generator")]
#[command(version)]
#[command(about = "Generate a favicon and app icon set from one image, emoji or text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every icon file and the web manifest
    Generate(GenerateCommand),

    /// Remove previously generated files
    Clear(ClearCommand),

    /// Print the HTML head tags for the generated files
    Head(HeadCommand),
}

#[derive(Args)]
struct GenerateCommand {
    /// Directory the files are written to
    #[arg(short, long, default_value = "public")]
    out: PathBuf,

    /// JSON settings document to start from and update after a run
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Image file, asset path (`container::path`) or http(s) URL
    #[arg(long, group = "input")]
    source: Option<String>,

    /// A single emoji
    #[arg(long, group = "input")]
    emoji: Option<String>,

    /// Up to four characters of text
    #[arg(long, group = "input")]
    text: Option<String>,

    /// Asset container as `handle=directory`; may be repeated
    #[arg(long = "container", value_parser = parse_container)]
    containers: Vec<(String, PathBuf)>,

    /// Download missing emoji artwork from the Twemoji CDN
    #[cfg(feature = "http")]
    #[arg(long)]
    twemoji_cdn: bool,

    #[command(flatten)]
    options: OptionArgs,
}

/// Overrides for individual generation options.
#[derive(Args)]
struct OptionArgs {
    #[arg(long)]
    app_name: Option<String>,
    #[arg(long)]
    short_name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    theme_color: Option<HexColor>,
    #[arg(long)]
    background_color: Option<HexColor>,
    #[arg(long, value_enum)]
    dark_mode: Option<DarkModeStyle>,
    #[arg(long)]
    dark_mode_color: Option<HexColor>,
    /// Recolor the icon (enables custom icon colors)
    #[arg(long)]
    icon_color: Option<HexColor>,
    #[arg(long)]
    dark_icon_color: Option<HexColor>,
    /// Padding on each edge in percent (0-40)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=40))]
    padding: Option<u8>,
    /// Opaque PNG background (disables transparency)
    #[arg(long)]
    png_background: Option<HexColor>,
    #[arg(long)]
    png_dark_background: Option<HexColor>,
    #[arg(long, value_enum)]
    text_font: Option<TextFont>,
    #[arg(long, value_enum)]
    text_weight: Option<TextWeight>,
    #[arg(long)]
    text_color: Option<HexColor>,
    #[arg(long)]
    text_background: Option<HexColor>,
}

#[derive(Args)]
struct ClearCommand {
    #[arg(short, long, default_value = "public")]
    out: PathBuf,
}

#[derive(Args)]
struct HeadCommand {
    #[arg(short, long, default_value = "public")]
    out: PathBuf,

    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Append `?v=<generated_at>` to every link
    #[arg(long)]
    cache_bust: bool,
}

fn parse_container(value: &str) -> Result<(String, PathBuf), String> {
    value
        .split_once('=')
        .map(|(handle, dir)| (handle.to_string(), PathBuf::from(dir)))
        .ok_or_else(|| format!("expected handle=directory, got {value:?}"))
}

impl OptionArgs {
    fn apply(&self, options: &mut GenerationOptions) {
        if let Some(name) = &self.app_name {
            options.app_name = name.clone();
        }
        if let Some(short) = &self.short_name {
            options.app_short_name = Some(short.clone());
        }
        if let Some(description) = &self.description {
            options.app_description = Some(description.clone());
        }
        if let Some(color) = self.theme_color {
            options.theme_color = color;
        }
        if let Some(color) = self.background_color {
            options.background_color = color;
        }
        if let Some(style) = self.dark_mode {
            options.dark_mode_style = style;
        }
        if let Some(color) = self.dark_mode_color {
            options.dark_mode_color = color;
        }
        if let Some(color) = self.icon_color {
            options.use_custom_icon_color = true;
            options.icon_color = color;
        }
        if let Some(color) = self.dark_icon_color {
            options.dark_mode_icon_color = color;
        }
        if let Some(padding) = self.padding {
            options.icon_padding = padding;
        }
        if let Some(color) = self.png_background {
            options.png_transparent = false;
            options.png_background = color;
        }
        if let Some(color) = self.png_dark_background {
            options.png_dark_background = color;
        }
        if let Some(font) = self.text_font {
            options.text_font = font;
        }
        if let Some(weight) = self.text_weight {
            options.text_weight = weight;
        }
        if let Some(color) = self.text_color {
            options.text_color = color;
        }
        if let Some(color) = self.text_background {
            options.text_background_color = Some(color);
        }
    }
}

impl GenerateCommand {
    fn run(&self) -> Result<(), FaviconError> {
        let mut settings = match &self.settings {
            Some(path) => SettingsDocument::load(path)?,
            None => None,
        }
        .unwrap_or_else(|| SettingsDocument::new(GenerationOptions::default()));

        self.options.apply(&mut settings.options);

        let source = if let Some(emoji) = &self.emoji {
            SourceDescriptor::Emoji(emoji.clone())
        } else if let Some(text) = &self.text {
            SourceDescriptor::Text(text.clone())
        } else if let Some(location) = &self.source {
            SourceDescriptor::from_location(location.clone())
        } else {
            settings
                .source
                .clone()
                .ok_or(favicon_generator::ValidationError::EmptySource)?
        };

        let assets = self
            .containers
            .iter()
            .fold(ContainerResolver::new(), |resolver, (handle, dir)| {
                resolver.with_container(handle.clone(), dir.clone())
            });
        let generator = FaviconGenerator::new(&self.out).with_assets(assets);

        #[cfg(feature = "http")]
        let generator = if self.twemoji_cdn {
            let fetcher = favicon_generator::HttpFetcher::new().map_err(|source| {
                FaviconError::RemoteFetch {
                    url: favicon_generator::glyph::TWEMOJI_CDN_BASE.to_string(),
                    source,
                }
            })?;
            generator.with_glyphs(favicon_generator::TwemojiCdn::new(fetcher))
        } else {
            generator
        };

        let files = generator.generate(&source, &settings.options)?;
        for path in files.iter() {
            println!("{}", path.display());
        }

        if let Some(path) = &self.settings {
            settings.source = Some(source);
            settings.mark_generated();
            settings.save(path)?;
        }

        Ok(())
    }
}

impl ClearCommand {
    fn run(&self) -> Result<(), FaviconError> {
        for path in FaviconGenerator::new(&self.out).clear()? {
            println!("removed {}", path.display());
        }
        Ok(())
    }
}

impl HeadCommand {
    fn run(&self) -> Result<(), FaviconError> {
        let settings = match &self.settings {
            Some(path) => SettingsDocument::load(path)?,
            None => None,
        };

        let tags = match &settings {
            Some(doc) => HeadTags::from_settings(doc),
            None => {
                let defaults = GenerationOptions::default();
                HeadTags::new(defaults.theme_color, defaults.app_name)
            }
        };
        let version = if self.cache_bust {
            settings.as_ref().and_then(|doc| doc.generated_at)
        } else {
            None
        };

        println!("{}", tags.scan(&self.out).with_cache_buster(version).render());
        Ok(())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Generate(cmd) => cmd.run(),
        Commands::Clear(cmd) => cmd.run(),
        Commands::Head(cmd) => cmd.run(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
