use env_logger::Env;

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    md_mermaid::run()
}
