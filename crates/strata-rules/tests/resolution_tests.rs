//! Full-stack resolution tests: builtin registry + shared presets + a
//! project-shaped configuration document

use std::path::Path;
use std::sync::Arc;

use strata_core::{
    CascadeEngine, ConfigDocument, EngineOptions, Severity, StrataError, Strictness,
};
use strata_rules::{builtin_registry, shared_presets};

fn document(json: &str) -> ConfigDocument {
    serde_json::from_str(json).unwrap()
}

fn engine(json: &str) -> CascadeEngine {
    CascadeEngine::with_shared_presets(
        document(json),
        &builtin_registry(),
        shared_presets(),
        EngineOptions::default(),
    )
    .unwrap()
}

/// A document shaped like a real multi-dialect frontend project: typed
/// sources by default, component files under their own parser, locale
/// catalogs with their own rules, and build scripts loosened.
const PROJECT_CONFIG: &str = r#"{
    "root": true,
    "parser": "typescript",
    "ignorePatterns": ["node_modules", "dist", "index.html", "*.cjs"],
    "plugins": ["import", "promise"],
    "extends": [
        "recommended",
        "plugin:import/recommended",
        "plugin:promise/recommended"
    ],
    "rules": {
        "no-console": ["warn", { "allow": ["error"] }],
        "no-continue": "off",
        "no-multi-spaces": "off",
        "no-restricted-syntax": 0,
        "no-multiple-empty-lines": 1,
        "import/no-extraneous-dependencies": ["error", { "devDependencies": true }]
    },
    "overrides": [
        {
            "files": ["*.sfc"],
            "parser": "sfc",
            "extends": ["plugin:sfc/recommended", "plugin:sfc/formatting-off"],
            "rules": {
                "import/first": "off",
                "import/no-duplicates": "off",
                "no-multiple-empty-lines": "off",
                "no-void": "off"
            }
        },
        {
            "files": ["*.sfc"],
            "excludedFiles": ["src/**/__meta__/**/*.sfc", "src/component-library/**/*.sfc"],
            "extends": ["plugin:intl/recommended"]
        },
        {
            "files": ["*.config.js"],
            "rules": { "no-console": "off" }
        },
        {
            "files": ["src/**/*.json"],
            "rules": {
                "sort-keys": "error",
                "quote-props": "off"
            }
        }
    ],
    "env": { "browser": true, "node": true },
    "globals": { "vi": true, "$$Generic": "readonly" },
    "settings": {
        "resolver": {
            "extensions": [".js", ".ts"],
            "moduleDirectories": ["node_modules", "src/"]
        }
    }
}"#;

#[test]
fn project_document_loads_without_warnings() {
    let engine = engine(PROJECT_CONFIG);
    assert!(
        engine.warnings().is_empty(),
        "unexpected warnings: {:?}",
        engine.warnings()
    );
}

#[test]
fn typed_sources_get_the_base_cascade() {
    let engine = engine(PROJECT_CONFIG);
    let config = engine.resolve(Path::new("src/stores/records.ts")).unwrap();

    assert_eq!(config.parser.as_deref(), Some("typescript"));
    // root rules
    assert_eq!(config.rules.severity_of("no-console"), Some(Severity::Warn));
    assert_eq!(config.rules.severity_of("no-continue"), Some(Severity::Off));
    // numeric alias normalized
    assert_eq!(
        config.rules.severity_of("no-multiple-empty-lines"),
        Some(Severity::Warn)
    );
    // plugin preset layer
    assert_eq!(
        config.rules.severity_of("promise/catch-or-return"),
        Some(Severity::Error)
    );
    // core correctness defaults survive untouched
    assert_eq!(
        config.rules.severity_of("no-constant-condition"),
        Some(Severity::Error)
    );
    // resolver settings pass through
    assert_eq!(config.resolver.module_directories, ["node_modules", "src/"]);
}

#[test]
fn component_files_switch_parser_and_loosen_imports() {
    let engine = engine(PROJECT_CONFIG);
    let config = engine.resolve(Path::new("src/pages/Home.sfc")).unwrap();

    assert_eq!(config.parser.as_deref(), Some("sfc"));
    assert_eq!(config.rules.severity_of("import/first"), Some(Severity::Off));
    assert_eq!(
        config.rules.severity_of("sfc/valid-template-root"),
        Some(Severity::Error)
    );
    // the second override layers translation coverage on top
    assert_eq!(
        config.rules.severity_of("intl/no-raw-text"),
        Some(Severity::Error)
    );
    // formatting handed back to the formatter via the chained preset
    assert_eq!(config.rules.severity_of("max-len"), Some(Severity::Off));
}

#[test]
fn excluded_component_trees_skip_translation_rules() {
    let engine = engine(PROJECT_CONFIG);

    let library = engine
        .resolve(Path::new("src/component-library/Button.sfc"))
        .unwrap();
    // first override still applies
    assert_eq!(library.parser.as_deref(), Some("sfc"));
    // second override is negated by its exclusion patterns
    assert_eq!(library.rules.severity_of("intl/no-raw-text"), None);

    let meta = engine
        .resolve(Path::new("src/pages/__meta__/Demo.sfc"))
        .unwrap();
    assert_eq!(meta.rules.severity_of("intl/no-raw-text"), None);
}

#[test]
fn build_scripts_silence_console_but_keep_the_rest() {
    let engine = engine(PROJECT_CONFIG);
    let config = engine.resolve(Path::new("vite.config.js")).unwrap();

    assert_eq!(config.rules.severity_of("no-console"), Some(Severity::Off));
    // per-key merge: identifiers the block does not touch keep base values
    assert_eq!(
        config.rules.severity_of("import/no-extraneous-dependencies"),
        Some(Severity::Error)
    );
}

#[test]
fn locale_catalogs_sort_their_keys() {
    let engine = engine(PROJECT_CONFIG);
    let config = engine.resolve(Path::new("src/i18n/languages/en/dict.json")).unwrap();

    assert_eq!(config.rules.severity_of("sort-keys"), Some(Severity::Error));
    assert_eq!(config.rules.severity_of("quote-props"), Some(Severity::Off));
    // no earlier override matched, so the parser stays the root one
    assert_eq!(config.parser.as_deref(), Some("typescript"));
}

#[test]
fn later_preset_wins_inside_one_extends_list() {
    // errors enables no-duplicates at error, warnings re-declares it at
    // warn; recommended extends errors then warnings, so warn wins
    let engine = engine(r#"{"extends": ["plugin:import/recommended"]}"#);
    let config = engine.resolve(Path::new("a.ts")).unwrap();
    assert_eq!(
        config.rules.severity_of("import/no-duplicates"),
        Some(Severity::Warn)
    );
    assert_eq!(
        config.rules.severity_of("import/no-unresolved"),
        Some(Severity::Error)
    );
}

#[test]
fn preset_declaration_order_is_significant() {
    let first = engine(r#"{"extends": ["plugin:import/errors", "plugin:import/warnings"]}"#);
    let config = first.resolve(Path::new("a.ts")).unwrap();
    assert_eq!(
        config.rules.severity_of("import/no-duplicates"),
        Some(Severity::Warn)
    );

    let flipped = engine(r#"{"extends": ["plugin:import/warnings", "plugin:import/errors"]}"#);
    let config = flipped.resolve(Path::new("a.ts")).unwrap();
    assert_eq!(
        config.rules.severity_of("import/no-duplicates"),
        Some(Severity::Error)
    );
}

#[test]
fn globals_and_env_reach_the_resolved_config() {
    let engine = engine(PROJECT_CONFIG);
    let config = engine.resolve(Path::new("src/app.ts")).unwrap();
    assert_eq!(config.env["browser"], true);
    assert!(config.globals.contains_key("vi"));
    assert!(config.globals.contains_key("$$Generic"));
}

#[test]
fn ignore_patterns_cover_generated_artifacts() {
    let engine = engine(PROJECT_CONFIG);
    assert!(engine.is_ignored(Path::new("index.html")));
    assert!(engine.is_ignored(Path::new("postcss.config.cjs")));
    assert!(!engine.is_ignored(Path::new("src/app.ts")));
}

#[test]
fn unknown_rules_warn_and_name_their_layer() {
    let engine = CascadeEngine::with_shared_presets(
        document(r#"{"rules": {"typescript/no-unsafe-call": "off"}}"#),
        &builtin_registry(),
        shared_presets(),
        EngineOptions::default(),
    )
    .unwrap();

    let warnings = engine.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].rule_id.as_deref(), Some("typescript/no-unsafe-call"));
    assert_eq!(warnings[0].layer, "root rules");
}

#[test]
fn strict_mode_rejects_unknown_rules_at_load() {
    let options = EngineOptions {
        unknown_rules: Strictness::Strict,
        ..Default::default()
    };
    let err = CascadeEngine::with_shared_presets(
        document(r#"{"rules": {"typescript/no-unsafe-call": "off"}}"#),
        &builtin_registry(),
        shared_presets(),
        options,
    )
    .unwrap_err();
    assert!(matches!(err, StrataError::UnknownRule { .. }));
}

#[test]
fn bad_positional_options_fail_the_load() {
    let err = CascadeEngine::with_shared_presets(
        // extensions expects a string mode before the mapping object
        document(r#"{"rules": {"import/extensions": ["error", { "js": "never" }, "oops"]}}"#),
        &builtin_registry(),
        shared_presets(),
        EngineOptions::default(),
    )
    .unwrap_err();
    match err {
        StrataError::InvalidRuleOptions { rule_id, layer, .. } => {
            assert_eq!(rule_id, "import/extensions");
            assert_eq!(layer, "root rules");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repeated_resolution_is_bit_identical() {
    let engine = engine(PROJECT_CONFIG);
    let first = engine.resolve(Path::new("src/pages/Home.sfc")).unwrap();
    let second = engine.resolve(Path::new("src/pages/Home.sfc")).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // and across engines built from the same document
    let other = engine(PROJECT_CONFIG);
    let third = other.resolve(Path::new("src/pages/Home.sfc")).unwrap();
    assert_eq!(*first, *third);
}
