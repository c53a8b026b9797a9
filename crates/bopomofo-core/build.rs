fn main() {
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    validate_toml(
        "src/syllable/tables/standard.toml",
        include_str!("src/syllable/tables/standard.toml"),
    );
    validate_toml(
        "src/syllable/tables/eten.toml",
        include_str!("src/syllable/tables/eten.toml"),
    );
    validate_toml(
        "src/syllable/tables/hsu.toml",
        include_str!("src/syllable/tables/hsu.toml"),
    );
    validate_toml(
        "src/syllable/tables/eten26.toml",
        include_str!("src/syllable/tables/eten26.toml"),
    );
    validate_toml(
        "src/syllable/tables/hanyu_pinyin.toml",
        include_str!("src/syllable/tables/hanyu_pinyin.toml"),
    );
    validate_toml(
        "src/syllable/tables/ibm.toml",
        include_str!("src/syllable/tables/ibm.toml"),
    );

    println!("cargo:rerun-if-changed=src/default_settings.toml");
    println!("cargo:rerun-if-changed=src/syllable/tables");
}

fn validate_toml(path: &str, content: &str) {
    content
        .parse::<toml::Value>()
        .unwrap_or_else(|e| panic!("{path} contains invalid TOML: {e}"));
}
