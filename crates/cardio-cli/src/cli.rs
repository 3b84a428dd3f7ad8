use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, ValueHint};

use cardio_classifiers::record::FEATURE_NAMES;

fn patient_flag_help(name: &str) -> &'static str {
    match name {
        "age" => "Age in years",
        "sex" => "Sex (1 = male, 0 = female)",
        "cp" => "Chest pain type (0-3)",
        "trestbps" => "Resting blood pressure (mm Hg)",
        "chol" => "Serum cholesterol (mg/dl)",
        "fbs" => "Fasting blood sugar > 120 mg/dl (1 = true, 0 = false)",
        "restecg" => "Resting ECG result (0-2)",
        "thalach" => "Maximum heart rate achieved",
        "exang" => "Exercise induced angina (1 = yes, 0 = no)",
        "oldpeak" => "ST depression induced by exercise relative to rest",
        "slope" => "Slope of the peak exercise ST segment (0-2)",
        "ca" => "Number of major vessels colored by fluoroscopy (0-3)",
        "thal" => "Thalassemia code, in the encoding declared by the model",
        _ => "",
    }
}

/// The `cardio` command tree.
pub fn build_cli() -> Command {
    let mut predict = Command::new("predict")
        .about("Score one patient")
        .arg(
            Arg::new("patient")
                .short('p')
                .long("patient")
                .help("JSON file holding one patient record")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the assessment as JSON")
                .action(ArgAction::SetTrue),
        );
    for name in FEATURE_NAMES {
        predict = predict.arg(
            Arg::new(name)
                .long(name)
                .help(patient_flag_help(name))
                .value_parser(clap::value_parser!(f64))
                .conflicts_with("patient")
                .help_heading("Patient attributes"),
        );
    }

    Command::new("cardio")
        .version(clap::crate_version!())
        .about("\u{2764}\u{FE0F} Cardio CLI - heart disease risk from a pre-trained classifier")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .global(true)
                .help("Path to predictor JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("artifact_dir")
                .long("artifact-dir")
                .global(true)
                .help(
                    "Directory holding the model artifact. \
                     Overrides the directory specified in the configuration file.",
                )
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("model_file")
                .long("model-file")
                .global(true)
                .help(
                    "Model file name inside the artifact directory. \
                     Overrides the name specified in the configuration file.",
                )
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(predict)
        .subcommand(
            Command::new("batch")
                .about("Score every patient in a CSV or TSV file")
                .arg(
                    Arg::new("input")
                        .help("Patients file with one column per attribute and an optional id column")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write the assessments CSV. Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("check").about("Report which artifact files exist and summarize the model"),
        )
        .subcommand(
            Command::new("demo")
                .about("Score the built-in example patients")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the assessments as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}
