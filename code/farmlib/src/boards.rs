use serde::{Deserialize, Serialize};

// Static informational boards: government support postings and the mock
// system log. Both are read-only seed datasets; the dashboard only renders
// them.

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct WelfarePost {
    pub id: u32,
    // Posting category, e.g. 지원금 / 교육 / 복지 / 금융 / 기술.
    pub category: String,
    pub title: String,
    // Deadline marker: "D-5", "상시", "마감임박".
    pub d_day: String,
    pub date: Option<String>,
    pub summary: Option<String>,
}

fn post(
    id: u32,
    category: &str,
    title: &str,
    d_day: &str,
    date: Option<&str>,
    summary: Option<&str>,
) -> WelfarePost {
    WelfarePost {
        id,
        category: category.to_string(),
        title: title.to_string(),
        d_day: d_day.to_string(),
        date: date.map(str::to_string),
        summary: summary.map(str::to_string),
    }
}

// The first four entries double as the dashboard's news strip; the rest only
// appear on the full board.
pub fn welfare_posts() -> Vec<WelfarePost> {
    vec![
        post(1, "지원금", "2024년 스마트팜 ICT 융복합 확산사업 공고", "D-5", None, None),
        post(2, "교육", "청년농업인 경영실습 임대농장 모집", "D-12", None, None),
        post(3, "복지", "농업인 국민연금 보험료 최대 50% 지원", "상시", None, None),
        post(4, "금융", "농어촌진흥기금 저금리(1%) 융자 신청", "마감임박", None, None),
        post(
            5,
            "교육",
            "2024년 미래농업대학 신입생 모집 요강",
            "D-20",
            Some("2024.03.15"),
            Some("미래 농업을 선도할 전문 인력 양성을 위한 2024년도 신입생을 모집합니다. 전액 국비 지원 및 기숙사 제공."),
        ),
        post(
            6,
            "지원금",
            "친환경 비료 지원 사업 추가 신청 안내",
            "D-7",
            Some("2024.03.10"),
            Some("지속 가능한 농업 환경 조성을 위해 유기질 비료 및 토양 개량제 구입비를 지원합니다."),
        ),
        post(
            7,
            "복지",
            "여성농업인 행복바우처 신청 접수",
            "D-15",
            Some("2024.03.05"),
            Some("여성 농업인의 삶의 질 향상을 위한 문화/복지 활동 비용을 지원합니다. (연간 20만원 상당)"),
        ),
        post(
            8,
            "기술",
            "스마트팜 데이터 활용 컨설팅 참여 농가 모집",
            "D-30",
            Some("2024.03.01"),
            Some("데이터 기반의 정밀 농업 실현을 위해 전문가가 직접 방문하여 생육 데이터 분석 및 환경 제어 컨설팅을 제공합니다."),
        ),
        post(
            9,
            "금융",
            "귀농 창업 및 주택 구입 지원 사업",
            "상시",
            Some("2024.02.20"),
            Some("귀농인의 안정적인 농촌 정착을 위해 창업 자금(최대 3억원) 및 주택 구입 자금(최대 7,500만원)을 융자 지원합니다."),
        ),
    ]
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Control,
    System,
    Ai,
    Sensor,
    Warning,
    User,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct LogEntry {
    pub id: u32,
    pub kind: LogKind,
    pub message: String,
    pub timestamp: String,
    pub status: LogStatus,
}

fn entry(id: u32, kind: LogKind, message: &str, timestamp: &str, status: LogStatus) -> LogEntry {
    LogEntry {
        id,
        kind,
        message: message.to_string(),
        timestamp: timestamp.to_string(),
        status,
    }
}

pub fn system_logs() -> Vec<LogEntry> {
    use LogKind::*;
    use LogStatus::*;
    vec![
        entry(101, Control, "자동 측창 닫힘 (외부 온도 저하)", "오후 8:45:12", Success),
        entry(102, Ai, "AI 생육 분석 리포트 생성 완료", "오후 8:30:00", Info),
        entry(103, Sensor, "CO2 농도 정상 범위 도달", "오후 8:15:22", Success),
        entry(104, Control, "순환 환기팬 작동 시작", "오후 8:10:05", Success),
        entry(105, LogKind::Warning, "외부 습도 85% 초과 경고", "오후 8:05:00", LogStatus::Warning),
        entry(106, System, "클라우드 데이터 동기화 완료", "오후 8:00:00", Info),
        entry(107, Control, "스마트 관수 시스템 대기 모드 전환", "오후 7:45:30", Success),
        entry(108, User, "사용자(JD) 접속 확인", "오후 7:30:15", Info),
        entry(109, Sensor, "일조량 부족 감지 (LED 자동 점등)", "오후 7:15:00", LogStatus::Warning),
        entry(110, Control, "생장 LED 켜짐", "오후 7:15:01", Success),
        entry(111, System, "시스템 부팅 완료", "오후 7:00:00", Info),
    ]
}
