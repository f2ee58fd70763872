//! Test doubles shared by the integration suites

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use country_agent::models::{
    Coordinate, CountryRecord, CurrencyInfo, NewsArticle, NewsDigest, RateTable, WeatherRecord,
};
use country_agent::{
    AgentError, ChatAgent, CountryGateway, ExchangeGateway, LlmClassifier, LlmClient,
    LlmSynthesizer, NewsGateway, Result, Services, WeatherGateway,
};

/// Language model that replays canned answers in order, then fails
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String>>>,
    pub calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Ok(text.to_string()))
    }

    pub fn fail(self) -> Self {
        self.push(Err(AgentError::llm("model offline")))
    }

    fn push(self, reply: Result<String>) -> Self {
        self.replies
            .lock()
            .expect("script lock")
            .push_back(reply);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _system: Option<&str>, _user: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::llm("script exhausted")))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Every gateway at once, answering from fixed tables
#[derive(Default)]
pub struct FakeWorld {
    pub countries: HashMap<String, CountryRecord>,
    pub countries_down: bool,
    /// Names whose lookup fails in transport while others still resolve
    pub unreachable_countries: Vec<String>,
    pub weather: Option<WeatherRecord>,
    pub tables: HashMap<String, RateTable>,
    pub headlines: Option<Vec<NewsArticle>>,
    pub country_calls: AtomicUsize,
    pub weather_calls: AtomicUsize,
    pub exchange_calls: AtomicUsize,
    pub news_calls: AtomicUsize,
}

impl FakeWorld {
    /// Vietnam, Japan and South Korea with weather, rates and headlines
    pub fn populated() -> Self {
        let countries = [vietnam(), japan(), south_korea()]
            .into_iter()
            .map(|country| (country.common_name.clone(), country))
            .collect();
        Self {
            countries,
            weather: Some(weather()),
            tables: HashMap::from([
                (
                    "VND".to_string(),
                    table("VND", &[("VND", 1.0), ("USD", 0.000_039), ("EUR", 0.000_036)]),
                ),
                ("JPY".to_string(), table("JPY", &[("JPY", 1.0), ("USD", 0.0067)])),
            ]),
            headlines: Some(headlines(8)),
            ..Self::default()
        }
    }

    pub fn into_services(self) -> (Arc<Self>, Services) {
        let world = Arc::new(self);
        let services = Services {
            countries: world.clone(),
            weather: world.clone(),
            exchange: world.clone(),
            news: world.clone(),
        };
        (world, services)
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CountryGateway for FakeWorld {
    async fn lookup(&self, name: &str) -> Result<Option<CountryRecord>> {
        self.country_calls.fetch_add(1, Ordering::SeqCst);
        if self.countries_down || self.unreachable_countries.iter().any(|n| n == name) {
            return Err(AgentError::api("REST Countries request failed: connection refused"));
        }
        Ok(self.countries.get(name).cloned())
    }
}

#[async_trait]
impl WeatherGateway for FakeWorld {
    async fn current(&self, _at: Coordinate) -> Result<WeatherRecord> {
        self.weather_calls.fetch_add(1, Ordering::SeqCst);
        self.weather
            .clone()
            .ok_or_else(|| AgentError::api("OpenWeatherMap request failed"))
    }
}

#[async_trait]
impl ExchangeGateway for FakeWorld {
    async fn rates(&self, base: &str) -> Result<Option<RateTable>> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tables.get(base).cloned())
    }
}

#[async_trait]
impl NewsGateway for FakeWorld {
    async fn top_headlines(&self, _alpha2_code: &str) -> Result<NewsDigest> {
        self.news_calls.fetch_add(1, Ordering::SeqCst);
        self.headlines
            .clone()
            .map(NewsDigest::from_provider_order)
            .ok_or_else(|| AgentError::api("NewsAPI request failed"))
    }
}

/// Agent using the real classifier and synthesizer over a scripted model
pub fn agent(world: FakeWorld, llm: ScriptedLlm) -> (Arc<FakeWorld>, Arc<ScriptedLlm>, ChatAgent) {
    let (world, services) = world.into_services();
    let llm = Arc::new(llm);
    let agent = ChatAgent::new(
        services,
        Arc::new(LlmClassifier::new(llm.clone())),
        Arc::new(LlmSynthesizer::new(llm.clone())),
    );
    (world, llm, agent)
}

pub fn vietnam() -> CountryRecord {
    CountryRecord {
        common_name: "Vietnam".to_string(),
        official_name: "Socialist Republic of Vietnam".to_string(),
        capital: vec!["Hanoi".to_string()],
        population: 97_338_583,
        area: Some(331_212.0),
        region: "Asia".to_string(),
        subregion: Some("South-Eastern Asia".to_string()),
        languages: BTreeMap::from([("vie".to_string(), "Vietnamese".to_string())]),
        currencies: BTreeMap::from([(
            "VND".to_string(),
            CurrencyInfo {
                name: "Vietnamese đồng".to_string(),
                symbol: Some("₫".to_string()),
            },
        )]),
        latlng: Some(Coordinate::new(16.166_666_66, 107.833_333_33)),
        capital_latlng: Some(Coordinate::new(21.03, 105.85)),
        alpha2_code: "VN".to_string(),
    }
}

pub fn japan() -> CountryRecord {
    CountryRecord {
        common_name: "Japan".to_string(),
        official_name: "Japan".to_string(),
        capital: vec!["Tokyo".to_string()],
        population: 125_836_021,
        area: Some(377_930.0),
        region: "Asia".to_string(),
        subregion: Some("Eastern Asia".to_string()),
        languages: BTreeMap::from([("jpn".to_string(), "Japanese".to_string())]),
        currencies: BTreeMap::from([(
            "JPY".to_string(),
            CurrencyInfo {
                name: "Japanese yen".to_string(),
                symbol: Some("¥".to_string()),
            },
        )]),
        latlng: Some(Coordinate::new(36.0, 138.0)),
        capital_latlng: Some(Coordinate::new(35.68, 139.75)),
        alpha2_code: "JP".to_string(),
    }
}

pub fn south_korea() -> CountryRecord {
    CountryRecord {
        common_name: "South Korea".to_string(),
        official_name: "Republic of Korea".to_string(),
        capital: vec!["Seoul".to_string()],
        population: 51_780_579,
        area: Some(100_210.0),
        region: "Asia".to_string(),
        subregion: Some("Eastern Asia".to_string()),
        languages: BTreeMap::from([("kor".to_string(), "Korean".to_string())]),
        currencies: BTreeMap::from([(
            "KRW".to_string(),
            CurrencyInfo {
                name: "South Korean won".to_string(),
                symbol: Some("₩".to_string()),
            },
        )]),
        latlng: Some(Coordinate::new(37.0, 127.5)),
        capital_latlng: Some(Coordinate::new(37.55, 126.99)),
        alpha2_code: "KR".to_string(),
    }
}

pub fn weather() -> WeatherRecord {
    WeatherRecord {
        description: "mây rải rác".to_string(),
        temp_c: 29.5,
        feels_like_c: 33.0,
        humidity_pct: 74,
        wind_speed_mps: 3.6,
        location_label: "Hanoi".to_string(),
    }
}

pub fn table(base: &str, rates: &[(&str, f64)]) -> RateTable {
    RateTable {
        base: base.to_string(),
        rates: rates
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect(),
    }
}

pub fn headlines(count: usize) -> Vec<NewsArticle> {
    (1..=count)
        .map(|i| NewsArticle {
            title: format!("Tiêu đề số {i}"),
            url: format!("https://news.example.com/{i}"),
            source: "VnExpress".to_string(),
            published_at: None,
        })
        .collect()
}

/// Classifier answer for `intent` with `entities` given as a JSON object body
pub fn classification(intent: &str, entities: &str) -> String {
    format!(r#"{{"intent": "{intent}", "entities": {entities}}}"#)
}
