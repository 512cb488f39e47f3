use clap::{AppSettings, Parser};

/// Sync multiple directory pairs in parallel, one rsync process per pair.
/// Anything after the --src-dst pairs is passed straight through to rsync.
#[derive(Debug, Parser)]
#[clap(name = "parsync", setting(AppSettings::TrailingVarArg), setting(AppSettings::AllowHyphenValues))]
pub struct ArgParser {
    /// Comma-separated source and destination (repeatable: --src-dst src1,dst1 --src-dst src2,dst2)
    #[clap(
        long = "src-dst",
        required = true,
        multiple_occurrences = true,
        parse(try_from_str = src_comma_dst)
    )]
    pub src_dst: Vec<(String, String)>,

    /// Extra flags applied identically to every rsync invocation
    #[clap(multiple_values = true, allow_hyphen_values = true)]
    pub extra_args: Vec<String>,
}

/// try_from_str parse function for --src-dst pairs
fn src_comma_dst(s: &str) -> Result<(String, String), String> {
    let mut v: Vec<String> = s.split(',').map(|part| part.trim().to_string()).collect();
    if v.len() != 2 {
        Err("Required format is SRC,DST".to_string())
    } else {
        let dst = v.pop().unwrap();
        let src = v.pop().unwrap();
        Ok((src, dst))
    }
}
