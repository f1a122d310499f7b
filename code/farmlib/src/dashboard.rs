use crate::advisory;
use crate::config::FarmConfig;
use crate::crops::{Crop, CropInfo, CropUpdate, initial_crops};
use crate::prompt::{DEFAULT_PROMPT_TEMPLATE, PromptContext, interpolate};
use crate::simulator::{Simulator, initial_reading};
use crate::types::{ControlState, DeviceToggleSet, Reading, SavedInsight, SensorHistory};
use anyhow::anyhow;

// The event feed shows only the most recent activity.
const FEED_CAPACITY: usize = 5;

const DEFAULT_CROP: &str = "딸기";

// The Dashboard owns all mutable application state and is the single place
// state transitions happen: the tick task, toggle commands, crop selection,
// prompt edits, and advisory results all flow through it, producing the next
// state in place. Persistence and HTTP live outside.
pub struct Dashboard {
    simulator: Simulator,
    reading: Reading,
    history: SensorHistory,
    controls: ControlState,
    crops: Vec<Crop>,
    selected_crop: String,
    prompt_template: String,
    advisory: Option<String>,
    analyzing: bool,
    feed: Vec<String>,
    insights: Vec<SavedInsight>,
}

impl Dashboard {
    pub fn new(simulator: Simulator, config: &FarmConfig, insights: Vec<SavedInsight>) -> Self {
        let reading = initial_reading();
        let history = SensorHistory::new(&reading);
        Self {
            simulator,
            reading,
            history,
            controls: ControlState::default(),
            crops: initial_crops(),
            selected_crop: DEFAULT_CROP.to_string(),
            prompt_template: config
                .prompt_template
                .clone()
                .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string()),
            advisory: None,
            analyzing: false,
            feed: vec![],
            insights,
        }
    }

    // One simulator tick: derive the next reading and roll it into the
    // history. Called every 2 seconds by the presentation layer's timer.
    pub fn tick(&mut self) {
        let next = self.simulator.next(&self.reading);
        self.history.record(&next);
        self.reading = next;
    }

    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    pub fn history(&self) -> &SensorHistory {
        &self.history
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn feed(&self) -> &[String] {
        &self.feed
    }

    pub fn insights(&self) -> &[SavedInsight] {
        &self.insights
    }

    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    pub fn analyzing(&self) -> bool {
        self.analyzing
    }

    // Applies a set of device toggles. There is no automatic device logic;
    // this is the only way control state changes.
    pub fn handle_toggle_cmd(&mut self, cmd: &DeviceToggleSet) -> anyhow::Result<()> {
        if cmd.toggles.is_empty() {
            return Err(anyhow!("Empty control request"));
        }

        for toggle in &cmd.toggles {
            self.controls.set(toggle.device, toggle.on);
            let status = if toggle.on { "켜짐" } else { "꺼짐" };
            self.push_feed(format!(
                "[제어] {} {} (Cloud Synced)",
                toggle.device.display_name(),
                status
            ));
        }
        Ok(())
    }

    pub fn selected_crop(&self) -> &str {
        &self.selected_crop
    }

    pub fn select_crop(&mut self, name: &str) {
        self.selected_crop = name.to_string();
    }

    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }

    pub fn crop_info(&self) -> CropInfo {
        CropInfo::find(&self.crops, &self.selected_crop)
    }

    pub fn update_crop_settings(&mut self, id: &str, update: &CropUpdate) -> anyhow::Result<()> {
        // Validate before touching anything so a bad update can't leave the
        // catalog half-applied.
        update.validate()?;
        let crop = self
            .crops
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow!("Unknown crop id '{id}'"))?;
        crop.update(update);
        let name = crop.name.clone();
        self.push_feed(format!("[설정] {name} 생육 환경 설정 변경됨"));
        Ok(())
    }

    pub fn prompt_template(&self) -> &str {
        &self.prompt_template
    }

    pub fn set_prompt_template(&mut self, template: &str) {
        self.prompt_template = template.to_string();
    }

    // Marks an analysis as pending, clears the previous result, and returns
    // the fully interpolated prompt to submit. Deliberately does not refuse a
    // second call while one is pending - that guard belongs to the caller.
    pub fn begin_analysis(&mut self) -> String {
        self.analyzing = true;
        self.advisory = None;
        let ctx = PromptContext::from_state(&self.selected_crop, &self.reading, &self.controls);
        interpolate(&self.prompt_template, &ctx)
    }

    // Delivers the analysis outcome exactly once: success becomes the
    // advisory text plus a feed entry, failure becomes a formatted error
    // string shown in the same panel.
    pub fn finish_analysis(&mut self, result: anyhow::Result<String>) {
        self.analyzing = false;
        match result {
            Ok(text) => {
                self.advisory = Some(text);
                self.push_feed("[AI] 환경 분석 완료".to_string());
            }
            Err(err) => {
                log::error!("Advisory request failed: {err:#}");
                self.advisory = Some(advisory::failure_text(&err));
            }
        }
    }

    // Snapshots the current advisory text for persistence. Returns None when
    // there is nothing to save.
    pub fn save_insight(&mut self) -> Option<SavedInsight> {
        let content = self.advisory.clone()?;
        let now = jiff::Zoned::now();
        let insight = SavedInsight {
            id: now.timestamp().as_millisecond().to_string(),
            crop: self.selected_crop.clone(),
            content,
            timestamp: now.strftime("%Y-%m-%d %H:%M:%S").to_string(),
        };
        // Most recent first.
        self.insights.insert(0, insight.clone());
        self.push_feed(format!("[저장] {} AI 분석 결과 저장됨", self.selected_crop));
        Some(insight)
    }

    pub fn delete_insight(&mut self, id: &str) -> bool {
        let before = self.insights.len();
        self.insights.retain(|i| i.id != id);
        self.insights.len() != before
    }

    fn push_feed(&mut self, message: String) {
        self.feed.insert(0, message);
        self.feed.truncate(FEED_CAPACITY);
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            reading: self.reading.clone(),
            controls: self.controls,
            selected_crop: self.selected_crop.clone(),
            crop: self.crop_info().resolve(),
            analyzing: self.analyzing,
            advisory: self.advisory.clone(),
            feed: self.feed.clone(),
        }
    }
}

// What the presentation layer renders: the current reading, control state,
// resolved crop record, advisory panel contents, and recent activity.
#[derive(Clone, serde::Serialize, serde::Deserialize, Debug, PartialEq)]
pub struct DashboardSnapshot {
    pub reading: Reading,
    pub controls: ControlState,
    pub selected_crop: String,
    pub crop: Crop,
    pub analyzing: bool,
    pub advisory: Option<String>,
    pub feed: Vec<String>,
}

pub fn print_dashboard_snapshot(snap: &DashboardSnapshot) {
    println!("Crop:     {} ({})", snap.selected_crop, snap.crop.variety);
    println!("Temp:     {:.1}C", snap.reading.temperature);
    println!("Humidity: {:.1}%", snap.reading.humidity);
    println!("Soil:     {:.1}%", snap.reading.soil_moisture);
    println!("CO2:      {}ppm", snap.reading.co2);
    println!("Light:    {}lux", snap.reading.light_intensity);
    println!("Synced:   {}", snap.reading.timestamp);
    println!(
        "Devices:  irrigation={} fan={} grow_light={} windows={}",
        snap.controls.irrigation, snap.controls.fan, snap.controls.grow_light, snap.controls.windows
    );
    if snap.analyzing {
        println!("Advisory: (analyzing...)");
    } else if let Some(advisory) = &snap.advisory {
        println!("Advisory:\n{advisory}");
    }
    for line in &snap.feed {
        println!("  {line}");
    }
}

#[cfg(test)]
mod dashboard {
    use super::*;
    use crate::config::Update;
    use crate::types::{Device, DeviceToggle, HISTORY_LEN};

    fn new_dashboard() -> Dashboard {
        Dashboard::new(
            Simulator::with_seed(1),
            &FarmConfig::new_with_reasonable_defaults(),
            vec![],
        )
    }

    #[test]
    fn tick_rolls_history() {
        let mut dash = new_dashboard();
        let initial = dash.reading().clone();
        for _ in 0..40 {
            dash.tick();
        }
        assert_eq!(dash.history().temperature.len(), HISTORY_LEN);
        assert_eq!(
            *dash.history().temperature.last().unwrap(),
            dash.reading().temperature
        );
        // 40 ticks with delta 1.0 keeps us well within drift bounds of the
        // seed, but the walk should have moved at least once.
        assert_ne!(dash.history().temperature, vec![initial.temperature; 30]);
    }

    #[test]
    fn toggle_updates_state_and_feed() {
        let mut dash = new_dashboard();
        let cmd = DeviceToggleSet {
            toggles: vec![DeviceToggle {
                device: Device::Irrigation,
                on: true,
            }],
        };
        dash.handle_toggle_cmd(&cmd).unwrap();
        assert!(dash.controls().irrigation);
        assert_eq!(dash.feed()[0], "[제어] 관수 시스템 켜짐 (Cloud Synced)");
    }

    #[test]
    fn empty_toggle_cmd_is_rejected() {
        let mut dash = new_dashboard();
        let result = dash.handle_toggle_cmd(&DeviceToggleSet { toggles: vec![] });
        assert!(result.is_err());
    }

    #[test]
    fn feed_is_capped_most_recent_first() {
        let mut dash = new_dashboard();
        for i in 0..8 {
            let cmd = DeviceToggleSet {
                toggles: vec![DeviceToggle {
                    device: Device::Fan,
                    on: i % 2 == 0,
                }],
            };
            dash.handle_toggle_cmd(&cmd).unwrap();
        }
        assert_eq!(dash.feed().len(), 5);
        assert_eq!(dash.feed()[0], "[제어] 환기팬 꺼짐 (Cloud Synced)");
    }

    #[test]
    fn analysis_lifecycle() {
        let mut dash = new_dashboard();
        assert!(!dash.analyzing());

        let prompt = dash.begin_analysis();
        assert!(dash.analyzing());
        assert!(prompt.contains("딸기"));
        assert!(!prompt.contains("{{"));

        dash.finish_analysis(Ok("토양 수분이 낮습니다.".to_string()));
        assert!(!dash.analyzing());
        assert_eq!(dash.advisory(), Some("토양 수분이 낮습니다."));
        assert_eq!(dash.feed()[0], "[AI] 환경 분석 완료");
    }

    #[test]
    fn failed_analysis_shows_error_string() {
        let mut dash = new_dashboard();
        dash.begin_analysis();
        dash.finish_analysis(Err(anyhow!("quota exceeded")));
        assert!(!dash.analyzing());
        assert_eq!(dash.advisory(), Some("⚠️ 분석 실패: quota exceeded"));
    }

    #[test]
    fn begin_analysis_clears_previous_result() {
        let mut dash = new_dashboard();
        dash.begin_analysis();
        dash.finish_analysis(Ok("이전 결과".to_string()));
        dash.begin_analysis();
        assert_eq!(dash.advisory(), None);
    }

    #[test]
    fn save_insight_requires_advisory() {
        let mut dash = new_dashboard();
        assert!(dash.save_insight().is_none());

        dash.begin_analysis();
        dash.finish_analysis(Ok("환기가 필요합니다.".to_string()));
        let saved = dash.save_insight().unwrap();
        assert_eq!(saved.crop, "딸기");
        assert_eq!(dash.insights()[0], saved);
        assert!(dash.delete_insight(&saved.id));
        assert!(!dash.delete_insight(&saved.id));
    }

    #[test]
    fn prompt_uses_selected_crop_and_devices() {
        let mut dash = new_dashboard();
        dash.select_crop("바질");
        dash.set_prompt_template("{{crop}}: {{devices}}");
        let prompt = dash.begin_analysis();
        // Fan is on by default.
        assert_eq!(prompt, "바질: 환기팬");
    }

    #[test]
    fn update_crop_settings_edits_catalog() {
        let mut dash = new_dashboard();
        let mut upd = CropUpdate::default();
        upd.optimal_temp = Update::Set("18~22".to_string());
        dash.update_crop_settings("strawberry", &upd).unwrap();
        assert_eq!(dash.crop_info().resolve().optimal_temp, "18~22");
        assert_eq!(dash.feed()[0], "[설정] 딸기 생육 환경 설정 변경됨");

        assert!(dash.update_crop_settings("kiwi", &upd).is_err());
    }
}
