use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "gadb",
    version,
    about = "GADB: Fast ADB Device Switcher",
    long_about = "Runs adb commands against a chosen device without repeating -s SERIAL.\n\
                  With no arguments it starts an interactive shell; otherwise the arguments \
                  run once as an adb command (a single .apk file is installed)."
)]
pub struct Cli {
    /// adb executable to use, overriding gadb.toml and GADB_ADB
    #[arg(long, value_name = "PATH")]
    pub adb: Option<String>,

    /// adb command to run once, e.g. `shell ps | grep foo` or `devices`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}
