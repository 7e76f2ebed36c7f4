use crate::core::config::data::{path_display, Config, ConfigKey};

impl Config {
    pub fn print_all(&self) {
        match Config::get_config_path() {
            Ok(path) => println!("Current configuration ({}):", path_display(path)),
            Err(_) => println!("Current configuration:"),
        }
        for line in self.describe() {
            println!("{line}");
        }
    }

    pub(crate) fn describe(&self) -> Vec<String> {
        ConfigKey::ALL
            .iter()
            .map(|key| match self.get(*key) {
                Some(value) => format!("  {key}: {value}"),
                None => format!("  {key}: (unset)"),
            })
            .collect()
    }
}
