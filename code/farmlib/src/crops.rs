use crate::config::Update;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};

// Variety label shown for crops the user typed in that aren't in the catalog.
const CUSTOM_VARIETY: &str = "사용자 지정";

// A crop and its recommended growing ranges. The ranges are free-form display
// strings ("20~25", "20k~30k"), not parsed numbers.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct Crop {
    pub id: String,
    pub name: String,
    pub variety: String,
    pub optimal_temp: String,
    pub optimal_humidity: String,
    pub optimal_soil: String,
    pub optimal_co2: String,
    pub optimal_lux: String,
}

// The crops every dashboard starts with.
pub fn initial_crops() -> Vec<Crop> {
    vec![
        Crop {
            id: "strawberry".into(),
            name: "딸기".into(),
            variety: "설향".into(),
            optimal_temp: "20~25".into(),
            optimal_humidity: "60~70".into(),
            optimal_soil: "50~60".into(),
            optimal_co2: "600~800".into(),
            optimal_lux: "20k~30k".into(),
        },
        Crop {
            id: "tomato".into(),
            name: "토마토".into(),
            variety: "완숙".into(),
            optimal_temp: "22~27".into(),
            optimal_humidity: "65~75".into(),
            optimal_soil: "60~70".into(),
            optimal_co2: "700~900".into(),
            optimal_lux: "30k~50k".into(),
        },
        Crop {
            id: "paprika".into(),
            name: "파프리카".into(),
            variety: "레드".into(),
            optimal_temp: "20~25".into(),
            optimal_humidity: "60~80".into(),
            optimal_soil: "55~65".into(),
            optimal_co2: "500~700".into(),
            optimal_lux: "25k~35k".into(),
        },
    ]
}

// Result of looking up the selected crop. A name with no catalog entry is an
// explicit Custom variant instead of a synthetic fallback record.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
#[serde(tag = "kind", content = "crop", rename_all = "snake_case")]
pub enum CropInfo {
    Known(Crop),
    Custom(String),
}

impl CropInfo {
    pub fn find(crops: &[Crop], name: &str) -> CropInfo {
        match crops.iter().find(|c| c.name == name) {
            Some(crop) => CropInfo::Known(crop.clone()),
            None => CropInfo::Custom(name.to_string()),
        }
    }

    // Materializes a displayable record either way. Custom crops get the
    // "user defined" variety and empty ranges.
    pub fn resolve(&self) -> Crop {
        match self {
            CropInfo::Known(crop) => crop.clone(),
            CropInfo::Custom(name) => Crop {
                id: "custom".into(),
                name: name.clone(),
                variety: CUSTOM_VARIETY.into(),
                optimal_temp: String::new(),
                optimal_humidity: String::new(),
                optimal_soil: String::new(),
                optimal_co2: String::new(),
                optimal_lux: String::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CropInfo::Known(crop) => &crop.name,
            CropInfo::Custom(name) => name,
        }
    }
}

// Wire format for editing a catalog crop's recommended ranges. See the
// comment on `Update` for the Set/Clear/NoChange json rules; clearing a range
// resets it to the empty string.
#[derive(Default, Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct CropUpdate {
    #[serde(default, skip_serializing_if = "Update::is_no_change")]
    pub optimal_temp: Update<String>,
    #[serde(default, skip_serializing_if = "Update::is_no_change")]
    pub optimal_humidity: Update<String>,
    #[serde(default, skip_serializing_if = "Update::is_no_change")]
    pub optimal_soil: Update<String>,
    #[serde(default, skip_serializing_if = "Update::is_no_change")]
    pub optimal_co2: Update<String>,
    #[serde(default, skip_serializing_if = "Update::is_no_change")]
    pub optimal_lux: Update<String>,
}

impl CropUpdate {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (field, update) in [
            ("optimal_temp", &self.optimal_temp),
            ("optimal_humidity", &self.optimal_humidity),
            ("optimal_soil", &self.optimal_soil),
            ("optimal_co2", &self.optimal_co2),
            ("optimal_lux", &self.optimal_lux),
        ] {
            if let Update::Set(value) = update {
                if value.len() > 30 {
                    return Err(anyhow!("Value for {} too long", field));
                }
            }
        }
        Ok(())
    }
}

impl Crop {
    pub fn update(&mut self, update: &CropUpdate) {
        apply(&mut self.optimal_temp, &update.optimal_temp);
        apply(&mut self.optimal_humidity, &update.optimal_humidity);
        apply(&mut self.optimal_soil, &update.optimal_soil);
        apply(&mut self.optimal_co2, &update.optimal_co2);
        apply(&mut self.optimal_lux, &update.optimal_lux);
    }
}

fn apply(field: &mut String, update: &Update<String>) {
    match update {
        Update::Set(value) => *field = value.clone(),
        Update::Clear => field.clear(),
        Update::NoChange => {}
    }
}

#[cfg(test)]
mod crop_info {
    use super::*;

    #[test]
    fn known_crop_resolves_to_catalog_entry() {
        let crops = initial_crops();
        let info = CropInfo::find(&crops, "딸기");
        assert_eq!(info.name(), "딸기");
        assert_eq!(info.resolve().variety, "설향");
    }

    #[test]
    fn unknown_crop_resolves_to_custom_record() {
        let crops = initial_crops();
        let info = CropInfo::find(&crops, "바질");
        assert_eq!(info, CropInfo::Custom("바질".to_string()));
        let resolved = info.resolve();
        assert_eq!(resolved.id, "custom");
        assert_eq!(resolved.variety, CUSTOM_VARIETY);
        assert_eq!(resolved.optimal_temp, "");
    }
}

#[cfg(test)]
mod crop_update {
    use super::*;

    #[test]
    fn update_set_one_field() {
        let mut upd = CropUpdate::default();
        upd.optimal_temp = Update::Set("18~22".to_string());
        assert_eq!(
            serde_json::to_string(&upd).unwrap(),
            "{\"optimal_temp\":\"18~22\"}"
        );
    }

    #[test]
    fn deserialize_set_one_clear_one() {
        let json = "{\"optimal_temp\":\"18~22\",\"optimal_lux\":null}";
        let upd: CropUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(upd.optimal_temp, Update::Set("18~22".to_string()));
        assert_eq!(upd.optimal_lux, Update::Clear);
        assert_eq!(upd.optimal_co2, Update::NoChange);
    }

    #[test]
    fn apply_update() {
        let mut crop = initial_crops().remove(0);
        let mut upd = CropUpdate::default();
        upd.optimal_temp = Update::Set("18~22".to_string());
        upd.optimal_lux = Update::Clear;
        crop.update(&upd);
        assert_eq!(crop.optimal_temp, "18~22");
        assert_eq!(crop.optimal_lux, "");
        assert_eq!(crop.optimal_humidity, "60~70");
    }

    #[test]
    fn validate_rejects_long_values() {
        let mut upd = CropUpdate::default();
        upd.optimal_co2 = Update::Set("x".repeat(31));
        assert!(upd.validate().is_err());
    }
}
