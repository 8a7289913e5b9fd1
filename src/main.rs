fn main() -> anyhow::Result<()> {
    tgpt_chat::cli::run()
}
