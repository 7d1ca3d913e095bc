use std::path::PathBuf;

const HELP: &str = "\
USAGE:
    shape [OPTIONS] <FONT-FILE> [TEXT]

OPTIONS:
    -h, --help                          Show help options
        --version                       Show version number
        --font-file PATH                Set font file-name
        --face-index INDEX              Set face index [default: 0]
        --ppem NUMBER                   Set pixels per em for device tables
        --text TEXT                     Set input text
        --text-file PATH                Set input text file
    -u, --unicodes LIST                 Set comma-separated list of input Unicode codepoints
                                        Examples: 'U+0644,U+0627'
        --direction DIRECTION           Set text direction
                                        [possible values: ltr, rtl]
        --language LANG                 Set text language as a BCP 47 tag
        --script TAG                    Set text script as ISO-15924 tag
        --features LIST                 Set comma-separated list of font features
                                        Examples: 'liga,-kern' [default: isol,init,medi,fina,rlig,liga,curs,kern]
        --skip-transparent              Skip marks when looking for joining neighbours
        --strict                        Fail on unsupported lookup types

ARGS:
    <FONT-FILE>                         A font file
    [TEXT]                              An optional text
";

const DEFAULT_FEATURES: &[harf::Feature] = &[
    harf::Feature::Isol,
    harf::Feature::Init,
    harf::Feature::Medi,
    harf::Feature::Fina,
    harf::Feature::Rlig,
    harf::Feature::Liga,
    harf::Feature::Curs,
    harf::Feature::Kern,
];

struct Args {
    help: bool,
    version: bool,
    font_file: Option<PathBuf>,
    face_index: u32,
    ppem: Option<u16>,
    text: Option<String>,
    text_file: Option<PathBuf>,
    unicodes: Option<String>,
    direction: Option<harf::Direction>,
    language: harf::Language,
    script: Option<harf::Script>,
    features: Option<Vec<harf::FeatureSetting>>,
    skip_transparent: bool,
    strict: bool,
    free: Vec<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    let args = Args {
        help: args.contains(["-h", "--help"]),
        version: args.contains("--version"),
        font_file: args.opt_value_from_str("--font-file")?,
        face_index: args.opt_value_from_str("--face-index")?.unwrap_or(0),
        ppem: args.opt_value_from_str("--ppem")?,
        text: args.opt_value_from_str("--text")?,
        text_file: args.opt_value_from_str("--text-file")?,
        unicodes: args.opt_value_from_fn(["-u", "--unicodes"], parse_unicodes)?,
        direction: args.opt_value_from_str("--direction")?,
        language: args.opt_value_from_str("--language")?.unwrap_or_default(),
        script: args.opt_value_from_str("--script")?,
        features: args.opt_value_from_fn("--features", parse_features)?,
        skip_transparent: args.contains("--skip-transparent"),
        strict: args.contains("--strict"),
        free: args
            .finish()
            .into_iter()
            .map(|s| s.to_string_lossy().into_owned())
            .collect(),
    };

    Ok(args)
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            std::process::exit(1);
        }
    };

    if args.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.help {
        print!("{}", HELP);
        return;
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut font_set_as_free_arg = false;
    let font_path = if let Some(path) = args.font_file {
        path
    } else if !args.free.is_empty() {
        font_set_as_free_arg = true;
        PathBuf::from(&args.free[0])
    } else {
        return Err("font is not set".into());
    };

    let font_data = std::fs::read(&font_path)
        .map_err(|e| format!("'{}' cannot be read: {}", font_path.display(), e))?;
    let mut face = harf::Face::from_slice(&font_data, args.face_index)?;
    face.set_pixels_per_em(args.ppem.map(|ppem| (ppem, ppem)));

    let text = if let Some(path) = args.text_file {
        std::fs::read_to_string(path)?
    } else if args.free.len() == 2 && font_set_as_free_arg {
        args.free[1].clone()
    } else if args.free.len() == 1 && !font_set_as_free_arg {
        args.free[0].clone()
    } else if let Some(text) = args.unicodes {
        text
    } else if let Some(text) = args.text {
        text
    } else {
        return Err("text is not set".into());
    };

    let mut ctx = harf::ShapingContext::new(&face)
        .language(args.language)
        .strict(args.strict);

    match args.features {
        Some(settings) => {
            for setting in settings {
                ctx = ctx.setting(setting);
            }
        }
        None => ctx = ctx.features(DEFAULT_FEATURES.iter().copied()),
    }

    if let Some(direction) = args.direction {
        ctx = ctx.direction(direction);
    }

    if let Some(script) = args.script {
        ctx = ctx.script(script);
    }

    if args.skip_transparent {
        ctx = ctx.joining_neighbors(harf::JoiningNeighbors::SkipTransparent);
    }

    let mut run = harf::Run::from_text(text.trim_end_matches('\n'));
    ctx.shape(&mut run)?;

    println!("{}", run.serialize());
    for lookup in run.unsupported_lookups() {
        eprintln!(
            "Warning: {} lookup {} has unsupported type {}.",
            lookup.table, lookup.lookup_index, lookup.kind
        );
    }

    Ok(())
}

fn parse_unicodes(s: &str) -> Result<String, String> {
    let mut text = String::new();
    for u in s.split(',') {
        let digits = u.trim().trim_start_matches("U+").trim_start_matches("u+");
        let u = u32::from_str_radix(digits, 16)
            .map_err(|_| format!("'{}' is not a valid codepoint", u))?;

        let c = char::from_u32(u).ok_or_else(|| format!("{} is not a valid codepoint", u))?;

        text.push(c);
    }

    Ok(text)
}

fn parse_features(s: &str) -> Result<Vec<harf::FeatureSetting>, String> {
    let mut features = Vec::new();
    for f in s.split(',') {
        features.push(f.parse().map_err(|e| format!("'{}': {}", f, e))?);
    }

    Ok(features)
}
