//! # Effect execution
//!
//! Components describe side effects as [`Effect`]s; this module carries them
//! out. Network work is spawned onto the Tokio runtime and reports back as a
//! [`Msg`] so the event loop never blocks on it.

use exoscope_api::PredictionClient;
use exoscope_table::Table;
use exoscope_util::UserPreferences;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::app::{App, Effect, Msg};

pub(crate) fn run_effects(app: &mut App, effects: Vec<Effect>, sender: &UnboundedSender<Msg>, preferences: &UserPreferences) {
    for effect in effects {
        match effect {
            Effect::Classify { model, table } => spawn_classification(model, table, sender.clone()),
            Effect::PersistEntriesPerPage(entries_per_page) => {
                if let Err(error) = preferences.set_entries_per_page(entries_per_page) {
                    warn!(%error, entries_per_page, "failed to persist entries per page");
                }
            }
            Effect::PersistTheme(theme) => {
                if let Err(error) = preferences.set_preferred_theme(Some(theme.id().to_string())) {
                    warn!(%error, theme = theme.id(), "failed to persist theme");
                }
            }
            Effect::Quit => app.should_quit = true,
        }
    }
}

fn spawn_classification(model: String, table: Table, sender: UnboundedSender<Msg>) {
    info!(model = %model, rows = table.len(), "classification started");
    tokio::spawn(async move {
        let outcome = match PredictionClient::new_from_env() {
            Ok(client) => client.classify_table(&model, &table).await,
            Err(error) => Err(error),
        };
        let outcome = outcome.map_err(|error| {
            warn!(%error, model = %model, "classification failed");
            error.to_string()
        });
        if sender.send(Msg::PredictionCompleted(Box::new(outcome))).is_err() {
            warn!("viewer closed before the classification finished");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Startup;
    use crate::ui::theme::ThemeName;
    use tokio::sync::mpsc;

    #[test]
    fn quit_and_persist_effects_apply_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let preferences = UserPreferences::load_from(dir.path().join("preferences.json")).unwrap();
        let mut app = App::new(Startup::default(), &preferences);
        let (sender, _receiver) = mpsc::unbounded_channel();

        run_effects(
            &mut app,
            vec![
                Effect::PersistEntriesPerPage(50),
                Effect::PersistTheme(ThemeName::Aurora),
                Effect::Quit,
            ],
            &sender,
            &preferences,
        );

        assert!(app.should_quit);
        let reloaded = UserPreferences::load_from(dir.path().join("preferences.json")).unwrap();
        assert_eq!(reloaded.entries_per_page(), Some(50));
        assert_eq!(reloaded.preferred_theme().as_deref(), Some("aurora"));
    }

    #[tokio::test]
    async fn failed_classification_reports_back() {
        let mut app = App::new(Startup::default(), &UserPreferences::ephemeral());
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let table = Table::new(["kepoi_name"]);

        run_effects(
            &mut app,
            vec![Effect::Classify { model: "rf".into(), table }],
            &sender,
            &UserPreferences::ephemeral(),
        );

        let Some(Msg::PredictionCompleted(outcome)) = receiver.recv().await else {
            panic!("expected a completion message");
        };
        let message = outcome.unwrap_err();
        assert!(message.starts_with("Missing required features"), "{message}");
    }
}
