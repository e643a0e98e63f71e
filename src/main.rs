fn main() -> anyhow::Result<()> {
    chat_export_explorer::cli::run()
}
