use std::time::Duration;

use crate::models::AppSettings;

/// One phase of the simulated remote sync: a user-visible label and a
/// fixed delay. Phases run in order, sequentially, with no cancellation.
pub(crate) struct SyncPhase {
    pub(crate) label: &'static str,
    pub(crate) delay: Duration,
}

/// The fixed submit sequence. The collection is only written after the
/// last phase completes, so a failure mid-sequence persists nothing.
pub(crate) const SUBMIT_PHASES: &[SyncPhase] = &[
    SyncPhase {
        label: "Conectando ao Google Sheets...",
        delay: Duration::from_millis(600),
    },
    SyncPhase {
        label: "Atualizando linha na Planilha Mestra...",
        delay: Duration::from_millis(800),
    },
    SyncPhase {
        label: "Salvando arquivos no Drive...",
        delay: Duration::from_millis(400),
    },
];

pub(crate) const DRIVE_CONNECT_DELAY: Duration = Duration::from_secs(2);
pub(crate) const DRIVE_FOLDER_NAME: &str = "Gestão de Orçamentos / 2024 (Conectado)";

/// Run the submit phases, reporting each label through `progress`.
pub(crate) fn run_submit_phases(progress: &mut dyn FnMut(&str)) {
    for phase in SUBMIT_PHASES {
        progress(phase.label);
        std::thread::sleep(phase.delay);
    }
}

/// Simulated OAuth2 handshake: a fixed delay, then the canned folder name.
pub(crate) fn connect_drive(settings: &mut AppSettings, progress: &mut dyn FnMut(&str)) {
    progress("Autenticando com o Google Drive...");
    std::thread::sleep(DRIVE_CONNECT_DELAY);
    settings.drive_connected = true;
    settings.drive_folder_name = DRIVE_FOLDER_NAME.to_string();
}

pub(crate) fn disconnect_drive(settings: &mut AppSettings) {
    settings.drive_connected = false;
    settings.drive_folder_name.clear();
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_phases_report_in_order() {
        let mut seen: Vec<String> = Vec::new();
        run_submit_phases(&mut |label| seen.push(label.to_string()));
        assert_eq!(
            seen,
            vec![
                "Conectando ao Google Sheets...",
                "Atualizando linha na Planilha Mestra...",
                "Salvando arquivos no Drive...",
            ]
        );
    }

    #[test]
    fn test_connect_and_disconnect() {
        let mut settings = AppSettings::default();
        let mut labels = 0;
        connect_drive(&mut settings, &mut |_| labels += 1);
        assert!(settings.drive_connected);
        assert_eq!(settings.drive_folder_name, DRIVE_FOLDER_NAME);
        assert_eq!(labels, 1);

        disconnect_drive(&mut settings);
        assert!(!settings.drive_connected);
        assert!(settings.drive_folder_name.is_empty());
    }
}
