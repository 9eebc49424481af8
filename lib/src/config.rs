//! Compiler configuration: one immutable value threaded through every stage.

use crate::alphabet::AlphabetSource;
use crate::errors::{CompileError, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use slvbr::header::{ENCODING_LEN, TITLE_LEN};
use slvbr::toc::{DEFAULT_CROP, DEFAULT_PAGE_SIZE};
use slvbr::WriterOptions;
use std::io::{BufReader, Write};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct CompilerConfig {
    /// Where the letter tags come from.
    #[builder(setter(into))]
    pub alphabet: AlphabetSource,
    /// Accepted morphology class letters; `None` accepts every record.
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    pub morph: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub exclude_topo: bool,
    #[builder(default)]
    #[serde(default)]
    pub exclude_nomen: bool,
    #[builder(default)]
    #[serde(default)]
    pub exclude_offensive: bool,
    /// Count letters without lower-casing the word first.
    #[builder(default)]
    #[serde(default)]
    pub case_sensitive: bool,
    /// Drop non-alphabetic characters even when the alphabet lists them.
    #[builder(default)]
    #[serde(default)]
    pub alpha_only: bool,
    /// Run the greedy tag-order optimizer before ranking.
    #[builder(default)]
    #[serde(default)]
    pub reorder_tags: bool,
    /// Text encoding label for bodies and tag ids.
    #[builder(setter(into), default = "\"utf-8\".to_string()")]
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[builder(setter(into), default = "\"slovobor\".to_string()")]
    #[serde(default = "default_title")]
    pub title: String,
    /// Minimum raw word length in characters.
    #[builder(default)]
    #[serde(default)]
    pub min_length: usize,
    #[builder(default = "DEFAULT_PAGE_SIZE")]
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Trailing synthetic tags ignored when merging TOC entries.
    #[builder(default = "DEFAULT_CROP")]
    #[serde(default = "default_crop")]
    pub crop: usize,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_title() -> String {
    "slovobor".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_crop() -> usize {
    DEFAULT_CROP
}

impl CompilerConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.page_size == Some(0) {
            return Err("page size must be positive".to_string());
        }
        if let Some(enc) = &self.encoding {
            if enc.len() > ENCODING_LEN {
                return Err(format!("encoding label {enc:?} is longer than {ENCODING_LEN} bytes"));
            }
        }
        if let Some(title) = &self.title {
            if title.len() > TITLE_LEN {
                return Err(format!("title is longer than {TITLE_LEN} bytes"));
            }
        }
        Ok(())
    }
}

impl From<CompilerConfigBuilderError> for CompileError {
    fn from(e: CompilerConfigBuilderError) -> Self {
        CompileError::Config(e.to_string())
    }
}

impl CompilerConfig {
    pub fn builder() -> CompilerConfigBuilder {
        CompilerConfigBuilder::default()
    }

    /// Options for the artifact writer.
    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            title: self.title.clone(),
            encoding: self.encoding.clone(),
            page_size: self.page_size,
            crop: self.crop,
        }
    }

    pub fn save_to_file(&self, file: &Path) -> Result<()> {
        let config_str = serde_json::to_string_pretty(&self)?;
        let mut file = std::fs::File::create(file)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    pub fn from_file(file: &Path) -> Result<Self> {
        let file = std::fs::File::open(file)?;
        let reader = BufReader::new(file);
        let config: CompilerConfig = serde_json::from_reader(reader)?;
        if config.page_size == 0 {
            return Err(CompileError::Config("page size must be positive".into()));
        }
        Ok(config)
    }

    /// Prints out the current config in a clear and readable way for command line output.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  Alphabet: {}", self.alphabet);
        if let Some(morph) = &self.morph {
            println!("  Morphology classes: {}", morph);
        }
        println!("  Exclude toponyms: {}", self.exclude_topo);
        println!("  Exclude proper nouns: {}", self.exclude_nomen);
        println!("  Exclude offensive: {}", self.exclude_offensive);
        println!("  Case sensitive: {}", self.case_sensitive);
        println!("  Alphabetic only: {}", self.alpha_only);
        println!("  Reorder tags: {}", self.reorder_tags);
        println!("  Encoding: {}", self.encoding);
        println!("  Title: {}", self.title);
        println!("  Min length: {}", self.min_length);
        println!("  TOC page size: {}", self.page_size);
        println!("  TOC crop: {}", self.crop);
    }
}
