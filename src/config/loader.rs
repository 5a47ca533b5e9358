// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, RunConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_config`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Build the validated run configuration for this process.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads the `--config` TOML file, if any (otherwise starts from defaults).
/// - Overlays command-line flags / `REPOLAUNCH_*` variables.
/// - Validates the result (durations parse, launch target is complete, ...).
pub fn load_config(args: &CliArgs) -> Result<RunConfig> {
    let mut raw = match args.config.as_deref() {
        Some(path) => load_from_path(path)?,
        None => RawConfigFile::default(),
    };
    raw.apply_cli(args);
    RunConfig::try_from(raw)
}

impl RawConfigFile {
    /// Overlay values given on the command line (or via environment).
    ///
    /// - Scalar options replace the file value when set.
    /// - List options replace the file list when at least one value is given.
    /// - Boolean switches can only turn a setting on.
    pub fn apply_cli(&mut self, args: &CliArgs) {
        fn set(slot: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }

        fn set_opt(slot: &mut Option<String>, value: &Option<String>) {
            if value.is_some() {
                *slot = value.clone();
            }
        }

        fn set_list(slot: &mut Vec<String>, values: &[String]) {
            if !values.is_empty() {
                *slot = values.to_vec();
            }
        }

        let gh = &mut self.github;
        set(&mut gh.organization, &args.github_organization);
        set_list(&mut gh.prefix, &args.github_prefix);
        set_list(&mut gh.exclude, &args.github_exclude);
        set_opt(&mut gh.access_token_uri, &args.github_access_token_uri);
        set(&mut gh.updated_since, &args.github_updated_since);
        set(&mut gh.api_url, &args.github_api_url);

        let ecs = &mut self.ecs;
        set(&mut ecs.task, &args.ecs_task);
        set(&mut ecs.container, &args.ecs_container);
        set(&mut ecs.cluster, &args.ecs_cluster);
        set(&mut ecs.launch_type, &args.ecs_launch_type);
        set(&mut ecs.platform_version, &args.ecs_platform_version);
        set(&mut ecs.public_ip, &args.ecs_public_ip);
        set_list(&mut ecs.subnets, &args.ecs_subnet);
        set_list(&mut ecs.security_groups, &args.ecs_security_group);
        set_opt(&mut ecs.task_command, &args.ecs_task_command);
        set_opt(&mut ecs.region, &args.aws_region);
        set_opt(&mut ecs.profile, &args.aws_profile);

        let run = &mut self.run;
        run.task_per_repo |= args.task_per_repo;
        run.dry_run |= args.dry_run;
        run.wait |= args.wait;
        set(&mut run.wait_timeout, &args.wait_timeout);
        set(&mut run.wait_interval, &args.wait_interval);
    }
}
