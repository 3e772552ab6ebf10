use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    pub config_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Serialized integer range, e.g. `{"min":0,"max":100,"scale":1,"step":1}`
#[derive(Args, Debug, Clone)]
pub struct RangeArg {
    #[arg(long = "range")]
    pub descriptor: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a raw device integer into application units
    Scale {
        #[command(flatten)]
        range: RangeArg,
        #[arg(allow_negative_numbers = true)]
        raw: f64,
    },

    /// Convert an application value back into a raw device integer
    Unscale {
        #[command(flatten)]
        range: RangeArg,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Map a raw value onto an external level range
    RemapTo {
        #[command(flatten)]
        range: RangeArg,
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Defaults to the configured `level_min`
        #[arg(long, allow_negative_numbers = true)]
        to_min: Option<f64>,
        /// Defaults to the configured `level_max`
        #[arg(long, allow_negative_numbers = true)]
        to_max: Option<f64>,
        #[arg(long)]
        reverse: bool,
    },

    /// Map an external level back into the raw range
    RemapFrom {
        #[command(flatten)]
        range: RangeArg,
        #[arg(allow_negative_numbers = true)]
        value: f64,
        #[arg(long, allow_negative_numbers = true)]
        from_min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        from_max: Option<f64>,
        #[arg(long)]
        reverse: bool,
    },

    /// List catalog devices, their points and decoded values
    Inspect {
        /// Device catalog; overrides `catalog_path` from the config
        #[arg(long)]
        catalog: Option<String>,
    },

    /// Write a value to an integer point through the catalog
    Set {
        #[arg(long)]
        catalog: Option<String>,
        /// Full point id, `{did}__{res_id}`
        point_id: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Treat `value` as a level instead of application units
        #[arg(long)]
        level: bool,
        #[arg(long)]
        reverse: bool,
    },
}
