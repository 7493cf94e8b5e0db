use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config};
use crate::grading::{default_bands, grading_warnings, AssessmentScheme, ScaleSet};

/// Line-based question and answer over any reader and writer, so the
/// wizard can run against stdin/stdout or a scripted session.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line).context("Failed to write to terminal")
    }

    /// Trimmed answer to `message`. Closed input is an error, not an empty answer.
    fn ask(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write to terminal")?;
        self.output.flush().context("Failed to flush output")?;
        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed before the wizard finished");
        }
        Ok(answer.trim().to_string())
    }

    fn ask_or(&mut self, message: &str, default: &str) -> Result<String> {
        let answer = self.ask(&format!("{} [{}]: ", message, default))?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    fn confirm(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let answer = self.ask(&format!("{} [{}]: ", message, hint))?.to_lowercase();
        Ok(match answer.as_str() {
            "" => default_yes,
            "y" | "yes" => true,
            _ => false,
        })
    }

    /// Keep asking until the answer parses as a weight.
    fn weight(&mut self, message: &str, default: u32) -> Result<u32> {
        loop {
            let answer = self.ask_or(message, &default.to_string())?;
            match parse_weight(&answer) {
                Ok(v) => return Ok(v),
                Err(e) => self.say(&format!("  Invalid: {}. Try again.", e))?,
            }
        }
    }
}

/// Parse a weight typed at the prompt. Weights are whole percentages.
fn parse_weight(input: &str) -> Result<u32, String> {
    match input.trim().parse::<u32>() {
        Ok(v) if v <= 100 => Ok(v),
        Ok(_) => Err("must be at most 100".to_string()),
        Err(_) => Err("must be a whole number between 0 and 100".to_string()),
    }
}

/// Serialize `config` as YAML and write it atomically, creating parent
/// directories as needed.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Ask for the assessment scheme and whether to seed the default grading
/// ladder.
fn ask_config<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<Config> {
    prompter.say("The assessment scheme decides how CA and exam marks combine into a subject total.")?;
    let defaults = AssessmentScheme::default();
    let name = prompter.ask_or("Scheme name", defaults.display_name())?;

    prompter.say("")?;
    prompter.say("Single CA: one CA mark out of 100, scaled by the CA weight.")?;
    prompter.say("Split CA: up to four CA marks (ca1..ca4), each marked out of its own weight.")?;
    let split = prompter.confirm("Use split CA components?", false)?;

    let mut scheme = AssessmentScheme {
        name: Some(name),
        ..AssessmentScheme::empty()
    };
    if split {
        scheme.ca1 = Some(prompter.weight("  ca1 weight (also its maximum mark)", 10)?);
        scheme.ca2 = Some(prompter.weight("  ca2 weight", 10)?);
        scheme.ca3 = Some(prompter.weight("  ca3 weight", 10)?);
        scheme.ca4 = Some(prompter.weight("  ca4 weight", 0)?);
    } else {
        scheme.ca = Some(prompter.weight("CA weight", defaults.ca.unwrap_or(30))?);
    }
    let remainder = 100u32.saturating_sub(scheme.ca_percentage());
    scheme.exam = Some(prompter.weight("Exam weight", remainder)?);

    prompter.say("")?;
    prompter.say("Without a grading scale the default ladder applies:")?;
    prompter.say("  A >= 80, B >= 70, C >= 60, D >= 50, E >= 40, else F")?;
    let write_scale = prompter.confirm(
        "Write the default ladder into the config so you can edit it later?",
        true,
    )?;
    let grading_scales = if write_scale {
        vec![ScaleSet {
            bands: default_bands(),
            ..ScaleSet::default()
        }]
    } else {
        Vec::new()
    };

    let config = Config {
        scheme,
        grading_scales,
    };
    for warning in grading_warnings(&config.scheme, &config.grading_scales) {
        prompter.say(&format!("  Note: {}", warning))?;
    }
    Ok(config)
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());

    prompter.say("")?;
    prompter.say("Gradebook Configuration Wizard")?;
    prompter.say("==============================")?;
    prompter.say("")?;

    let config = ask_config(&mut prompter)?;

    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    prompter.say("")?;
    let path_str = prompter.ask_or(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompter.confirm(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            prompter.say("Aborted.")?;
            return Ok(());
        }
    }

    write_config(&config_path, &config)?;
    tracing::info!(path = %config_path.display(), "config written");

    prompter.say("")?;
    prompter.say(&format!("Config written to {}", config_path.display()))?;
    prompter.say("Run `gradebook check` to review it, or `gradebook report <results.json>` to get started.")?;

    Ok(())
}
