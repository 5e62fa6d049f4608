#[cfg(test)]
mod tests {
    use crate::cli::validation::parse_marker;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_parse_marker_valid_identifiers() {
        assert_eq!(parse_marker("RunEntry"), Ok("RunEntry".to_string()));
        assert_eq!(parse_marker("$inherits"), Ok("$inherits".to_string()));
        assert_eq!(parse_marker("_start"), Ok("_start".to_string()));
        assert_eq!(parse_marker("main$1"), Ok("main$1".to_string()));
    }

    #[test]
    fn test_parse_marker_invalid() {
        assert!(parse_marker("").is_err());
        assert!(parse_marker("1run").is_err());
        assert!(parse_marker("run-entry").is_err());
        assert!(parse_marker("ns.run").is_err());

        let err = parse_marker("run entry").unwrap_err();
        assert!(err.contains("' '"));
    }

    #[test]
    fn test_parse_marker_agrees_with_config_validation() {
        for name in ["RunEntry", "_start", "main$1", "", "1run", "run-entry", "ns.run", "é$"] {
            let config = husk_shaker::ShakerConfig::default().with_entry_marker(name);
            assert_eq!(
                parse_marker(name).is_ok(),
                config.validate().is_ok(),
                "flag and config disagree on {name:?}"
            );
        }
    }

    #[test]
    fn test_shake_command_parsing() {
        let cli = Cli::try_parse_from(["husk", "shake", "out/app.js", "-o", "out/app.min.js"]).unwrap();
        match cli.command {
            Command::Shake(args) => {
                assert_eq!(args.input, PathBuf::from("out/app.js"));
                assert_eq!(args.output, Some(PathBuf::from("out/app.min.js")));
            }
            _ => panic!("Expected Shake command"),
        }
        assert!(!cli.module);
        assert!(cli.entry_marker.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "husk",
            "analyze",
            "app.js",
            "--json",
            "report.json",
            "--entry-marker",
            "start",
            "--module",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.entry_marker.as_deref(), Some("start"));
        assert!(cli.module);
        assert!(cli.verbose);
        match cli.command {
            Command::Analyze(args) => assert_eq!(args.json, Some(PathBuf::from("report.json"))),
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_invalid_marker_is_rejected() {
        let result = Cli::try_parse_from(["husk", "shake", "app.js", "--inherits-marker", "a-b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["husk", "-v", "-q", "shake", "app.js"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["husk", "shake"]).is_err());
    }
}
