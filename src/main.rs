fn main() -> Result<(), Box<dyn std::error::Error>> {
    nexus_chat::cli::main()
}
