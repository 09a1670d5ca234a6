use cbbd_normalizer::normalizer::RecordKind;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, ValueEnum};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Output encoding of the assembled table
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON array of row objects
    #[default]
    Json,
    /// CSV with a header row
    Csv,
}

/// Focused view of the assembled table
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewName {
    /// Plays that changed the score (play)
    ScoringPlays,
    /// Plays in game-clock order (play)
    GameFlow,
    /// Plays filtered by --play-type and --team (play)
    PlayTypes,
    /// Lines of one --provider (line)
    ProviderLines,
    /// Lines of one --team from its perspective (line)
    LineTrends,
    /// SP+ ratings only (rating)
    SpRatings,
    /// Ratings grouped by system, optionally for one --team (rating)
    CompareRatings,
}

/// College basketball API response normalizer
///
/// Reads a JSON payload returned by the college basketball data API, turns
/// each record of the chosen kind into a flat, cleaned row and writes the
/// resulting table as JSON or CSV.
///
/// Malformed records are skipped and reported on stderr; they never abort
/// the whole run.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Record kind of the payload (team, game, roster, ranking, rating, line, play, player_stats, venue, boxscore_team, boxscore_player)
    #[arg(short = 'k', long = "kind", value_parser = parse_kind)]
    pub kind: Option<RecordKind>,

    /// Input JSON file. Reads stdin when omitted or "-".
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<String>,

    /// Output file. Writes to stdout when omitted or "-".
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<String>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Column to coerce to numbers in the visualization pass (repeatable)
    #[arg(long = "numeric", value_name = "COLUMN", help_heading = "Visualization")]
    pub numeric: Vec<String>,

    /// Column to trim and case-normalize in the visualization pass (repeatable)
    #[arg(long = "categorical", value_name = "COLUMN", help_heading = "Visualization")]
    pub categorical: Vec<String>,

    /// Column to normalize to RFC 3339 in the visualization pass (repeatable)
    #[arg(long = "date", value_name = "COLUMN", help_heading = "Visualization")]
    pub date: Vec<String>,

    /// Reduce the table to a focused view
    #[arg(long = "view", value_enum, help_heading = "Views")]
    pub view: Option<ViewName>,

    /// Team filter for the play-types, line-trends and compare-ratings views
    #[arg(long = "team", value_name = "TEAM", help_heading = "Views")]
    pub team: Option<String>,

    /// Provider filter for the provider-lines view
    #[arg(long = "provider", value_name = "PROVIDER", help_heading = "Views")]
    pub provider: Option<String>,

    /// Play type filter for the play-types view
    #[arg(long = "play-type", value_name = "TYPE", help_heading = "Views")]
    pub play_type: Option<String>,

    /// Separator joining nested keys while flattening
    #[arg(long = "separator", value_name = "SEP", help_heading = "Flattening")]
    pub separator: Option<String>,

    /// Keep sequences as opaque values instead of expanding them into indexed keys
    #[arg(long = "no-expand-sequences", help_heading = "Flattening")]
    pub no_expand_sequences: bool,

    /// Number of nesting levels to flatten; deeper structure is kept whole
    #[arg(long = "depth-limit", value_name = "N", help_heading = "Flattening")]
    pub depth_limit: Option<usize>,

    /// Skip records whose flattened keys collide instead of keeping the last value
    #[arg(long = "strict-collisions", help_heading = "Flattening")]
    pub strict_collisions: bool,

    /// Rename output columns to snake_case
    #[arg(long = "snake-case")]
    pub snake_case: bool,

    /// Use a config file other than the default location
    #[arg(long = "config", value_name = "PATH", help_heading = "Configuration")]
    pub config: Option<String>,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// List the supported record kinds and their columns
    #[arg(long = "list-kinds", help_heading = "Info")]
    pub list_kinds: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,

    /// Log only to the log file, not to stderr
    #[arg(short = 'q', long = "quiet", help_heading = "Debug")]
    pub quiet: bool,
}

fn parse_kind(value: &str) -> Result<RecordKind, String> {
    value.parse::<RecordKind>().map_err(|e| e.to_string())
}
