fn main() -> anyhow::Result<()> {
    // Host builds (tests, docs) have no ESP-IDF to link against.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("espidf") {
        return Ok(());
    }

    embuild::build::CfgArgs::output_propagated("ESP_IDF")?;
    embuild::build::LinkArgs::output_propagated("ESP_IDF")
}
