fn main() -> anyhow::Result<()> {
    fluxscale::run()
}
