/*  Copyright (C) 2023 by the sfdk-modules developers
    This file is part of sfdk-modules.

    sfdk-modules validates input and post-processes build artifacts for
    the SDK command line tool.

    sfdk-modules is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    sfdk-modules is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{arg, command, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use serde::Serialize;
use simple_logger::SimpleLogger;

use sfdk_modules::arguments::{append_build_flag, filter_cmake_arguments};
use sfdk_modules::compile_commands::{rewrite_compile_commands, PathMapping};
use sfdk_modules::configuration::{self, Configuration};
use sfdk_modules::host::local::{ConfiguredOptions, ConfiguredSdk, LocalFileSystem, LogConsole};
use sfdk_modules::packaging::wrap_option;
use sfdk_modules::signing::provision_signing_key;
use sfdk_modules::validators::{Context as ValidationContext, Kind};

fn main() -> Result<()> {
    let arguments = Arguments::parse()?.validate()?;
    let application = Application::configure(arguments)?;
    application.run()?;

    Ok(())
}

#[derive(Debug, PartialEq)]
struct Arguments {
    config: Option<String>,
    verbose: u8,
    mode: Mode,
}

#[derive(Debug, PartialEq)]
enum Mode {
    RewriteCompileCommands { directory: PathBuf },
    Validate { validator: String, value: String },
    ProvisionSigningKey,
    FilterCmakeArguments { arguments: Vec<String> },
    AppendBuildFlag { arguments: Vec<String> },
    FormatOption { name: String, flags: Vec<String> },
}

fn cli() -> Command {
    command!()
        .args(&[
            arg!(-c --config <FILE> "Path of the config file"),
            arg!(-v --verbose ... "Sets the level of verbosity")
                .action(ArgAction::Count),
        ])
        .subcommand_required(true)
        .subcommands([
            Command::new("rewrite-compile-commands")
                .about("Make the compilation databases usable on the host")
                .arg(arg!(-d --directory <DIR> "Directory to search for compile_commands.json")
                    .default_value(".")),
            Command::new("validate")
                .about("Validate an option value")
                .args(&[
                    arg!(<VALIDATOR> "Name of the validator"),
                    arg!(<VALUE> "The value to validate")
                        .allow_hyphen_values(true),
                ]),
            Command::new("provision-signing-key")
                .about("Import the signing key of the selected user"),
            Command::new("filter-cmake-arguments")
                .about("Drop toolchain overrides from a cmake command line")
                .arg(arg!([ARGS] ... "The cmake arguments").last(true)),
            Command::new("append-build-flag")
                .about("Extend a cmake command line to export the compilation database")
                .arg(arg!([ARGS] ... "The cmake arguments").last(true)),
            Command::new("format-option")
                .about("Format an option for the packaging tool")
                .args(&[
                    arg!(<NAME> "Name of the option"),
                    arg!([FLAGS] ... "The default formatted flags").last(true),
                ]),
        ])
}

fn values(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches.get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn value(matches: &ArgMatches, id: &str) -> Result<String> {
    matches.get_one::<String>(id)
        .cloned()
        .ok_or_else(|| anyhow!("Missing argument: {}", id))
}

impl Arguments {
    fn parse() -> Result<Self> {
        Self::from_matches(&cli().get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mode = match matches.subcommand() {
            Some(("rewrite-compile-commands", sub)) =>
                Mode::RewriteCompileCommands { directory: PathBuf::from(value(sub, "directory")?) },
            Some(("validate", sub)) =>
                Mode::Validate { validator: value(sub, "VALIDATOR")?, value: value(sub, "VALUE")? },
            Some(("provision-signing-key", _)) =>
                Mode::ProvisionSigningKey,
            Some(("filter-cmake-arguments", sub)) =>
                Mode::FilterCmakeArguments { arguments: values(sub, "ARGS") },
            Some(("append-build-flag", sub)) =>
                Mode::AppendBuildFlag { arguments: values(sub, "ARGS") },
            Some(("format-option", sub)) =>
                Mode::FormatOption { name: value(sub, "NAME")?, flags: values(sub, "FLAGS") },
            _ =>
                return Err(anyhow!("Unknown subcommand")),
        };

        Ok(Arguments {
            config: matches.get_one::<String>("config")
                .map(String::to_string),
            verbose: matches.get_count("verbose"),
            mode,
        })
    }

    fn validate(self) -> Result<Self> {
        if let Mode::Validate { validator, .. } = &self.mode {
            Kind::try_from(validator.as_str())
                .map_err(|message| anyhow!(message))?;
        }

        Ok(self)
    }

    fn prepare_logging(&self) -> Result<()> {
        let level = match &self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        let mut logger = SimpleLogger::new()
            .with_level(level);
        if level >= LevelFilter::Debug {
            logger = logger.with_local_timestamps()
        }
        logger.init()?;

        Ok(())
    }

    fn configuration(&self) -> Result<Configuration> {
        let configuration = match self.config.as_deref() {
            Some("-") | Some("/dev/stdin") =>
                configuration::io::from_stdin()
                    .context("Failed to read configuration from stdin")?,
            Some(file) =>
                configuration::io::from_file(Path::new(file))
                    .with_context(|| format!("Failed to read configuration from file: {}", file))?,
            None =>
                Configuration::default(),
        };
        Ok(configuration)
    }
}

#[derive(Debug, PartialEq)]
struct Application {
    arguments: Arguments,
    configuration: Configuration,
}

impl Application {
    fn configure(arguments: Arguments) -> Result<Self> {
        arguments.prepare_logging()?;

        let configuration = arguments.configuration()?;

        Ok(Application { arguments, configuration })
    }

    fn run(self) -> Result<()> {
        let Application { arguments, configuration } = self;
        let fs = LocalFileSystem;
        let sdk = ConfiguredSdk::from(&configuration);
        let options = ConfiguredOptions::from(&configuration);

        match arguments.mode {
            Mode::RewriteCompileCommands { directory } => {
                let engine = configuration.build_engine.as_ref()
                    .ok_or_else(|| anyhow!("The build engine is not configured"))?;
                let mapping = PathMapping::from(engine);
                let files = rewrite_compile_commands(&directory, &fs, &options, &sdk, &mapping, &LogConsole)
                    .with_context(|| format!("Failed to rewrite compilation databases under {:?}", directory))?;
                for file in files {
                    log::info!("Rewritten {}", file.display());
                }
            }
            Mode::Validate { validator, value } => {
                let kind = Kind::try_from(validator.as_str())
                    .map_err(|message| anyhow!(message))?;
                let workspace = configuration.workspace();
                let context = ValidationContext {
                    fs: &fs,
                    engine: &sdk,
                    devices: &sdk,
                    workspace: workspace.as_deref(),
                };
                print_json(&kind.validate(&value, &context))?;
            }
            Mode::ProvisionSigningKey =>
                provision_signing_key(&options, &sdk)
                    .map_err(|message| anyhow!(message))?,
            Mode::FilterCmakeArguments { arguments } =>
                print_json(&filter_cmake_arguments(&arguments))?,
            Mode::AppendBuildFlag { arguments } =>
                print_json(&append_build_flag(&arguments))?,
            Mode::FormatOption { name, flags } =>
                print_json(&wrap_option(&name, &flags))?,
        }

        Ok(())
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
