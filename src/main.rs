// Range Calendar demo
// Main entry point

use range_calendar::models::settings::PickerConfig;
use range_calendar::services::date_picker::{DatePickerHost, PickerEvent};
use range_calendar::services::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
use range_calendar::services::settings::{PickerSettings, SettingsService};
use range_calendar::ui_egui::date_picker;

type DemoStore = Box<dyn KeyValueStore>;

struct DemoApp {
    order_date: DatePickerHost<DemoStore>,
    report_period: DatePickerHost<DemoStore>,
    history: Vec<String>,
}

impl DemoApp {
    fn new(settings: &PickerSettings) -> Self {
        let order_config = settings
            .pickers
            .get("order_date")
            .cloned()
            .unwrap_or_else(|| PickerConfig::single().with_storage_key("order-date"));
        let period_config = settings
            .pickers
            .get("report_period")
            .cloned()
            .unwrap_or_else(|| PickerConfig::range().with_storage_key("report-period"));

        Self {
            order_date: DatePickerHost::new(order_config, open_store()),
            report_period: DatePickerHost::new(period_config, open_store()),
            history: Vec::new(),
        }
    }

    fn record_events(&mut self, picker: &str, events: Vec<PickerEvent>) {
        for event in events {
            log::info!("{}: {:?}", picker, event);
            let line = match event {
                PickerEvent::DateSelected(date) => format!("{picker}: selected {date}"),
                PickerEvent::RangeSelected(range) => {
                    format!("{picker}: selected {} to {}", range.start, range.end)
                }
                PickerEvent::Closed => continue,
            };
            self.history.push(line);
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Date pickers");
            ui.add_space(8.0);

            ui.label("Order date");
            date_picker(ui, &mut self.order_date, "order_date");
            ui.add_space(12.0);

            ui.label("Report period");
            date_picker(ui, &mut self.report_period, "report_period");
            ui.add_space(16.0);

            ui.separator();
            ui.label(format!("Order date valid: {}", self.order_date.is_valid()));
            ui.label(format!("Report period valid: {}", self.report_period.is_valid()));
            for line in self.history.iter().rev().take(10) {
                ui.small(line);
            }
        });

        let order_events = self.order_date.drain_events();
        self.record_events("order_date", order_events);
        let period_events = self.report_period.drain_events();
        self.record_events("report_period", period_events);
    }
}

fn open_store() -> DemoStore {
    match JsonFileStore::default_location() {
        Some(store) => {
            log::debug!("Persisting picker state to {}", store.path().display());
            Box::new(store)
        }
        None => {
            log::warn!("No data directory available, selections will not survive a restart");
            Box::new(MemoryStore::new())
        }
    }
}

fn load_settings() -> PickerSettings {
    match SettingsService::default_path() {
        Some(path) => SettingsService::new(path).load_or_default(),
        None => {
            log::warn!("No config directory available, using default picker settings");
            PickerSettings::default()
        }
    }
}

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Range Calendar demo");

    let settings = load_settings();
    let app = DemoApp::new(&settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Range Calendar")
            .with_inner_size([560.0, 480.0])
            .with_min_inner_size([320.0, 220.0]),
        ..Default::default()
    };

    eframe::run_native("Range Calendar", options, Box::new(|_cc| Ok(Box::new(app))))
}
