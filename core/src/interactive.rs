use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;

use indicatif::ProgressBar;

pub mod util {
    use dialoguer::{theme::ColorfulTheme, Confirm};
    use std::io;

    fn theme() -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn ask_yes_no(prompt: &str, default: bool) -> io::Result<bool> {
        Confirm::with_theme(&theme())
            .with_prompt(prompt)
            .default(default)
            .interact()
    }
}

/// `[Y/n]` prompt; answering with just Enter means yes.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    Ok(util::ask_yes_no(prompt, true)?)
}

pub trait SpinnerExt {
    fn with_ticking(self) -> Arc<Mutex<Self>>;
}

impl SpinnerExt for ProgressBar {
    fn with_ticking(self) -> Arc<Mutex<Self>> {
        let mutex_spinner = Arc::new(Mutex::new(self));
        let spinner = mutex_spinner.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let spinner = spinner.lock().await;
                if spinner.is_finished() {
                    break;
                }
                spinner.tick();
            }
        });
        mutex_spinner
    }
}
