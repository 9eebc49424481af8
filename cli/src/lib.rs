use anyhow::{anyhow, Error, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use slovobor::text::{decode, resolve_encoding};
use slovobor::{compile_to_file, read_records, AlphabetSource, CompilerConfig};
use slvbr::{SlvbrFile, TagKind};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "slvbr")]
#[command(about = "Compile word lists into slovobor sub-anagram dictionary indexes")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compile a JSON word list into a slvbr artifact
    Compile(CompileArgs),
    /// Print the header and section summary of a slvbr artifact
    Stat {
        /// Artifact to inspect
        #[clap(long, short)]
        file: PathBuf,
        /// Decode the bodies of the first N lines
        #[clap(long, short)]
        list: Option<usize>,
        /// Print the summary as JSON
        #[clap(long, action)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct CompileArgs {
    /// JSON array of word records; `-` reads stdin, `.zst` files are decompressed
    #[clap(default_value = "-")]
    input: PathBuf,
    /// Where to write the artifact
    #[clap(default_value = "slvbr.db")]
    output: PathBuf,
    /// Load compiler settings from a JSON file; alphabet flags override it
    #[clap(long)]
    config: Option<PathBuf>,
    /// Write the effective settings to a JSON file
    #[clap(long)]
    save_config: Option<PathBuf>,
    /// Accepted morphology classes, e.g. NVA
    #[clap(long)]
    morph: Option<String>,
    /// Skip toponyms
    #[clap(long, action)]
    no_topo: bool,
    /// Skip proper nouns
    #[clap(long, action)]
    no_nomen: bool,
    /// Skip offensive words
    #[clap(long, action)]
    no_offensive: bool,
    /// Count letters without lower-casing words
    #[clap(long, action)]
    case_sensitive: bool,
    /// Explicit tag letters, in order
    #[clap(long, conflicts_with = "tags_language")]
    tags: Option<String>,
    /// Take tag letters from a locale's alphabet, e.g. ru or de_AT
    #[clap(long)]
    tags_language: Option<String>,
    /// Count only alphabetic characters
    #[clap(long, action)]
    tags_alpha_only: bool,
    /// Reorder tags greedily for better TOC compression
    #[clap(long, action)]
    best_tag_order: bool,
    /// Text encoding of bodies and tag ids
    #[clap(long)]
    encoding: Option<String>,
    /// Title stored in the artifact header
    #[clap(long)]
    title: Option<String>,
    /// Minimum word length in characters
    #[clap(long)]
    min_length: Option<usize>,
    /// Lines per TOC page before compression
    #[clap(long)]
    page_size: Option<usize>,
    /// Trailing tags ignored when merging TOC pages
    #[clap(long)]
    crop: Option<usize>,
}

impl CompileArgs {
    fn alphabet(&self) -> Option<AlphabetSource> {
        match (&self.tags, &self.tags_language) {
            (Some(letters), _) => Some(AlphabetSource::Explicit(letters.clone())),
            (None, Some(lang)) => Some(AlphabetSource::Locale(lang.clone())),
            (None, None) => None,
        }
    }

    /// Settings from `--config` (if any) with command line flags applied on top.
    fn to_config(&self) -> Result<CompilerConfig> {
        let mut builder = match &self.config {
            Some(path) => {
                let base = CompilerConfig::from_file(path)?;
                let mut b = CompilerConfig::builder();
                b.alphabet(base.alphabet)
                    .exclude_topo(base.exclude_topo)
                    .exclude_nomen(base.exclude_nomen)
                    .exclude_offensive(base.exclude_offensive)
                    .case_sensitive(base.case_sensitive)
                    .alpha_only(base.alpha_only)
                    .reorder_tags(base.reorder_tags)
                    .encoding(base.encoding)
                    .title(base.title)
                    .min_length(base.min_length)
                    .page_size(base.page_size)
                    .crop(base.crop);
                if let Some(morph) = base.morph {
                    b.morph(morph);
                }
                b
            }
            None => CompilerConfig::builder(),
        };
        match self.alphabet() {
            Some(source) => {
                builder.alphabet(source);
            }
            None if self.config.is_none() => {
                return Err(anyhow!("one of --tags or --tags-language is required"));
            }
            None => {}
        }
        if let Some(morph) = &self.morph {
            builder.morph(morph.clone());
        }
        if self.no_topo {
            builder.exclude_topo(true);
        }
        if self.no_nomen {
            builder.exclude_nomen(true);
        }
        if self.no_offensive {
            builder.exclude_offensive(true);
        }
        if self.case_sensitive {
            builder.case_sensitive(true);
        }
        if self.tags_alpha_only {
            builder.alpha_only(true);
        }
        if self.best_tag_order {
            builder.reorder_tags(true);
        }
        if let Some(encoding) = &self.encoding {
            builder.encoding(encoding.clone());
        }
        if let Some(title) = &self.title {
            builder.title(title.clone());
        }
        if let Some(n) = self.min_length {
            builder.min_length(n);
        }
        if let Some(n) = self.page_size {
            builder.page_size(n);
        }
        if let Some(n) = self.crop {
            builder.crop(n);
        }
        Ok(builder.build()?)
    }
}

pub fn run() -> Result<()> {
    let cmd = Cli::parse();
    execute(cmd)
}

pub fn run_from_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cmd = Cli::try_parse_from(args).map_err(Error::from)?;
    execute(cmd)
}

fn execute(cmd: Cli) -> Result<()> {
    // CLI flags take precedence over RUST_LOG; without either we log warnings only.
    if cmd.debug {
        std::env::set_var("RUST_LOG", "debug");
    } else if cmd.verbose {
        std::env::set_var("RUST_LOG", "info");
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    let _ = env_logger::try_init();

    match cmd.command {
        Commands::Compile(args) => {
            let config = args.to_config()?;
            if cmd.verbose || cmd.debug {
                config.print();
            }
            if let Some(path) = &args.save_config {
                config.save_to_file(path)?;
                info!("saved settings to {}", path.display());
            }
            let records = read_records(&args.input)?;
            let artifact = compile_to_file(records, &config, &args.output)?;
            let meta = artifact.meta();
            println!(
                "Compiled {} records into {} ({} TOC entries, bog {} bytes)",
                meta.record_count,
                args.output.display(),
                meta.toc_count,
                meta.bog_len
            );
        }
        Commands::Stat { file, list, json } => {
            stat(&file, list, json, cmd.verbose || cmd.debug)?;
        }
    }
    Ok(())
}

fn kind_name(kind: TagKind) -> &'static str {
    match kind {
        TagKind::Letter => "letter",
        TagKind::Length => "length",
        TagKind::Morph => "morph",
        TagKind::Flag => "flag",
    }
}

fn stat(path: &Path, list: Option<usize>, json: bool, show_tags: bool) -> Result<()> {
    let file = SlvbrFile::open_mmap(path)?;
    let meta = file.meta();
    let (pages, covered) = file.count_toc();
    let digest = blake3::hash(file.as_bytes());
    let encoding = resolve_encoding(&meta.encoding_str())?;
    let tag_ids: Vec<String> = file
        .tags()
        .iter()
        .map(|t| decode(encoding, t.id_bytes()))
        .collect();
    let bodies: Vec<String> = (0..list.unwrap_or(0).min(file.record_count()))
        .filter_map(|i| file.body(i).map(|b| decode(encoding, b)))
        .collect();

    if json {
        let tags: Vec<serde_json::Value> = file
            .tags()
            .iter()
            .zip(&tag_ids)
            .map(|(t, id)| serde_json::json!({"kind": kind_name(t.kind), "id": id}))
            .collect();
        let out = serde_json::json!({
            "title": meta.title_str(),
            "encoding": meta.encoding_str(),
            "version": meta.version,
            "records": meta.record_count,
            "record_len": meta.record_len,
            "tags": tags,
            "bog_len": meta.bog_len,
            "toc_entries": pages,
            "toc_records": covered,
            "file_len": file.as_bytes().len(),
            "blake3": digest.to_hex().to_string(),
            "bodies": bodies,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("File: {}", path.display());
    println!("  Title: {}", meta.title_str());
    println!("  Version: {}", meta.version);
    println!("  Encoding: {}", meta.encoding_str());
    println!("  Records: {} x {} bytes", meta.record_count, meta.record_len);
    println!("  Tags: {}", meta.tags_count);
    if show_tags {
        for (i, (t, id)) in file.tags().iter().zip(&tag_ids).enumerate() {
            println!("    {:>3} {:<6} {}", i, kind_name(t.kind), id);
        }
    }
    println!("  Bog: {} bytes", meta.bog_len);
    println!("  TOC: {} entries covering {} records", pages, covered);
    println!("  Size: {} bytes", file.as_bytes().len());
    println!("  blake3: {}", digest.to_hex());
    for (i, body) in bodies.iter().enumerate() {
        let tags = file.line_tags(i).unwrap_or_default();
        println!("  {:>6} {} {:?}", i, body, tags);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CompileArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Compile(a) => a,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn compile_defaults() {
        let args = parse(&["slvbr", "compile", "--tags-language", "ru"]);
        assert_eq!(args.input, PathBuf::from("-"));
        assert_eq!(args.output, PathBuf::from("slvbr.db"));
        let cfg = args.to_config().unwrap();
        assert_eq!(cfg.alphabet, AlphabetSource::Locale("ru".into()));
        assert_eq!(cfg.page_size, 20);
        assert_eq!(cfg.crop, 4);
    }

    #[test]
    fn flags_map_onto_config() {
        let args = parse(&[
            "slvbr",
            "compile",
            "in.json",
            "out.db",
            "--tags",
            "кот",
            "--morph",
            "NV",
            "--no-topo",
            "--no-nomen",
            "--no-offensive",
            "--tags-alpha-only",
            "--best-tag-order",
            "--encoding",
            "cp1251",
            "--min-length",
            "3",
            "--page-size",
            "10",
        ]);
        let cfg = args.to_config().unwrap();
        assert_eq!(cfg.alphabet, AlphabetSource::Explicit("кот".into()));
        assert_eq!(cfg.morph.as_deref(), Some("NV"));
        assert!(cfg.exclude_topo && cfg.exclude_nomen && cfg.exclude_offensive);
        assert!(cfg.alpha_only && cfg.reorder_tags);
        assert!(!cfg.case_sensitive);
        assert_eq!(cfg.encoding, "cp1251");
        assert_eq!(cfg.min_length, 3);
        assert_eq!(cfg.page_size, 10);
    }

    #[test]
    fn alphabet_is_required_without_config() {
        assert!(parse(&["slvbr", "compile"]).to_config().is_err());
    }

    #[test]
    fn tags_and_language_conflict() {
        assert!(
            Cli::try_parse_from(["slvbr", "compile", "--tags", "ab", "--tags-language", "ru"])
                .is_err()
        );
    }

    #[test]
    fn config_file_is_overridden_by_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(
            &path,
            r#"{"alphabet": {"explicit": "abc"}, "min_length": 4, "title": "base"}"#,
        )
        .unwrap();
        let p = path.to_str().unwrap();
        let cfg = parse(&["slvbr", "compile", "--config", p, "--title", "over"])
            .to_config()
            .unwrap();
        assert_eq!(cfg.alphabet, AlphabetSource::Explicit("abc".into()));
        assert_eq!(cfg.min_length, 4);
        assert_eq!(cfg.title, "over");
    }
}
