use crate::types::{ControlState, Device, Reading};

// Placeholder vocabulary is a wire-level contract with user-authored
// templates: exactly crop, temp, humidity, soil, co2, lux, devices.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
당신은 스마트팜 AI 농업 컨설턴트입니다. 아래 센서 데이터를 분석하고 현재 작물 상태와 개선 방안을 제안해주세요.

작물: {{crop}}
환경 데이터:
- 온도: {{temp}}°C
- 습도: {{humidity}}%
- 토양 수분: {{soil}}%
- CO2: {{co2}}ppm
- 일조량: {{lux}}lux

현재 작동 중인 장치: {{devices}}

분석 결과와 조언을 간단명료하게 작성해주세요.";

// Substituted for {{devices}} when no device is active.
pub const NO_ACTIVE_DEVICES: &str = "없음";

// Order in which active devices appear in the {{devices}} value, independent
// of toggle order.
const DEVICE_SUMMARY_ORDER: [Device; 4] = [
    Device::Fan,
    Device::Irrigation,
    Device::GrowLight,
    Device::Windows,
];

// Snapshot of everything the template can reference. Fully typed, so a
// "missing" context field is unrepresentable.
#[derive(Clone, Debug, PartialEq)]
pub struct PromptContext {
    pub crop: String,
    pub temp: f64,
    pub humidity: f64,
    pub soil: f64,
    pub co2: i32,
    pub lux: i32,
    pub devices: String,
}

impl PromptContext {
    pub fn from_state(crop: &str, reading: &Reading, controls: &ControlState) -> Self {
        Self {
            crop: crop.to_string(),
            temp: reading.temperature,
            humidity: reading.humidity,
            soil: reading.soil_moisture,
            co2: reading.co2,
            lux: reading.light_intensity,
            devices: device_summary(controls),
        }
    }
}

// Comma-joined short names of the active devices, or the "none" sentinel.
pub fn device_summary(controls: &ControlState) -> String {
    let active: Vec<&str> = DEVICE_SUMMARY_ORDER
        .into_iter()
        .filter(|d| controls.get(*d))
        .map(|d| d.prompt_name())
        .collect();
    if active.is_empty() {
        NO_ACTIVE_DEVICES.to_string()
    } else {
        active.join(", ")
    }
}

// Replaces every occurrence of a recognized {{token}} with the string form of
// the corresponding context value. Single pass: unrecognized tokens are left
// verbatim, and inserted values are never re-scanned, so a value containing
// {{...}} text passes through untouched. Total - cannot fail.
pub fn interpolate(template: &str, ctx: &PromptContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find("}}") else {
            // Unterminated marker, keep the remainder as-is.
            out.push_str(tail);
            return out;
        };
        match token_value(&tail[2..end], ctx) {
            Some(value) => {
                out.push_str(&value);
                rest = &tail[end + 2..];
            }
            None => {
                // Not a recognized token. Emit just the opening braces and
                // rescan from the next character, so a recognized token that
                // starts inside this span (a stray "{{" before a real one)
                // is still replaced.
                out.push_str("{{");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn token_value(name: &str, ctx: &PromptContext) -> Option<String> {
    match name {
        "crop" => Some(ctx.crop.clone()),
        "temp" => Some(fmt_number(ctx.temp)),
        "humidity" => Some(fmt_number(ctx.humidity)),
        "soil" => Some(fmt_number(ctx.soil)),
        "co2" => Some(ctx.co2.to_string()),
        "lux" => Some(ctx.lux.to_string()),
        "devices" => Some(ctx.devices.clone()),
        _ => None,
    }
}

// Display formatting drops a trailing ".0" (24.0 renders as "24"), matching
// how the template values have always been rendered.
fn fmt_number(v: f64) -> String {
    format!("{v}")
}

#[cfg(test)]
mod interpolate {
    use super::*;

    fn ctx() -> PromptContext {
        PromptContext {
            crop: "토마토".to_string(),
            temp: 24.5,
            humidity: 60.0,
            soil: 45.3,
            co2: 450,
            lux: 800,
            devices: "환기팬, LED".to_string(),
        }
    }

    #[test]
    fn token_free_template_is_unchanged() {
        let t = "아무 토큰도 없는 문장 {not-a-token}";
        assert_eq!(interpolate(t, &ctx()), t);
    }

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(interpolate("{{crop}}-{{crop}}", &ctx()), "토마토-토마토");
    }

    #[test]
    fn unrecognized_tokens_left_verbatim() {
        assert_eq!(
            interpolate("{{crop}} / {{unknown}}", &ctx()),
            "토마토 / {{unknown}}"
        );
    }

    #[test]
    fn token_after_stray_open_brace_is_still_replaced() {
        assert_eq!(interpolate("{{ {{crop}}", &ctx()), "{{ 토마토");
        assert_eq!(interpolate("{{x{{crop}}", &ctx()), "{{x토마토");
    }

    #[test]
    fn inserted_values_are_not_rescanned() {
        let mut c = ctx();
        c.crop = "{{temp}}".to_string();
        assert_eq!(interpolate("{{crop}}", &c), "{{temp}}");
    }

    #[test]
    fn unterminated_marker_passes_through() {
        assert_eq!(interpolate("abc {{crop", &ctx()), "abc {{crop");
    }

    #[test]
    fn whole_numbers_render_without_decimal() {
        assert_eq!(interpolate("{{humidity}}%", &ctx()), "60%");
        assert_eq!(interpolate("{{temp}}°C", &ctx()), "24.5°C");
    }

    #[test]
    fn default_template_is_fully_substituted() {
        let result = interpolate(DEFAULT_PROMPT_TEMPLATE, &ctx());
        assert!(!result.contains("{{"), "leftover token in: {result}");
        assert!(result.contains("작물: 토마토"));
        assert!(result.contains("- CO2: 450ppm"));
    }
}

#[cfg(test)]
mod device_summary {
    use super::*;
    use crate::types::ControlState;

    #[test]
    fn no_active_devices_yields_sentinel() {
        let mut controls = ControlState::default();
        controls.set(Device::Fan, false);
        assert_eq!(device_summary(&controls), NO_ACTIVE_DEVICES);
    }

    #[test]
    fn fixed_order_regardless_of_toggle_order() {
        let mut controls = ControlState::default();
        controls.set(Device::Windows, true);
        controls.set(Device::Irrigation, true);
        assert_eq!(device_summary(&controls), "환기팬, 관수, 측창");
    }
}
