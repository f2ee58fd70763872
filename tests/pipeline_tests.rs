//! End-to-end turn tests against injected gateways and a scripted model

mod common;

use common::{FakeWorld, ScriptedLlm, agent, classification, table};
use country_agent::models::ExchangeTier;
use country_agent::{DispatchPath, Intent, ReplySource};
use rstest::rstest;

#[tokio::test]
async fn test_population_of_vietnam_with_template_fallback() {
    let llm = ScriptedLlm::new()
        .reply(&classification(
            "get_country_info",
            r#"{"country": "Vietnam", "criteria": "dân số"}"#,
        ))
        .fail();
    let (_, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("dân số Việt Nam").await;

    assert_eq!(report.intent, Intent::GetCountryInfo);
    assert_eq!(report.path, DispatchPath::Handled);
    assert_eq!(report.reply_source, ReplySource::Template);
    assert!(report.result.reply_text.contains("97.338.583"));
    assert_eq!(report.result.map_label.as_deref(), Some("Vietnam"));
    let coordinate = report.result.map_coordinate.unwrap();
    assert!((coordinate.latitude - 16.166_666_66).abs() < 1e-9);
}

#[tokio::test]
async fn test_synthesized_reply_is_stripped_of_bold() {
    let llm = ScriptedLlm::new()
        .reply(&classification("get_country_info", r#"{"country": "Japan"}"#))
        .reply("- **Thủ đô**: Tokyo\n- __Dân số__: 125.836.021\n- **Khu vực: Asia");
    let (_, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("Cho tôi biết về Nhật Bản").await;

    assert_eq!(report.reply_source, ReplySource::Llm);
    assert_eq!(
        report.result.reply_text,
        "- Thủ đô: Tokyo\n- Dân số: 125.836.021\n- Khu vực: Asia"
    );
}

#[rstest]
#[case::country("get_country_info", r#"{"country": "Vietnam"}"#)]
#[case::compare("compare_countries", r#"{"country": ["Japan", "South Korea"]}"#)]
#[case::weather("get_weather", r#"{"location": "Vietnam"}"#)]
#[case::exchange("get_exchange_rate", r#"{"country": "Japan"}"#)]
#[case::news("get_news", r#"{"country": "Vietnam"}"#)]
#[case::travel("travel_recommendation", r#"{"preferences": "biển"}"#)]
#[case::chat("general_chat", "{}")]
#[tokio::test]
async fn test_every_intent_replies_without_emphasis(
    #[case] intent: &str,
    #[case] entities: &str,
    #[values(true, false)] model_writes_reply: bool,
) {
    let mut llm = ScriptedLlm::new().reply(&classification(intent, entities));
    llm = if model_writes_reply {
        llm.reply("**Kết quả**: xem __chi tiết__ bên dưới **ngay")
    } else {
        llm.fail()
    };
    let (_, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("câu hỏi").await;

    assert_eq!(report.intent.as_str(), intent);
    assert_eq!(report.path, DispatchPath::Handled);
    let reply = &report.result.reply_text;
    assert!(!reply.trim().is_empty());
    assert!(!reply.contains("**"), "bold left in {reply:?}");
    assert!(!reply.contains("__"), "bold left in {reply:?}");
}

#[tokio::test]
async fn test_exchange_substitutes_usd_with_note() {
    let llm = ScriptedLlm::new()
        .reply(&classification(
            "get_exchange_rate",
            r#"{"currency": "JPY", "target_currency": "XAF"}"#,
        ))
        .reply("- 1 JPY = 0.0067 USD");
    let (_, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("1 yên bằng bao nhiêu franc CFA?").await;

    assert_eq!(report.exchange_tier, Some(ExchangeTier::ReferenceSubstitute));
    let reply = &report.result.reply_text;
    assert!(reply.contains("USD"));
    assert!(reply.contains("Không tìm thấy tỷ giá JPY sang XAF"));
    assert!(report.result.map_coordinate.is_none());
}

#[tokio::test]
async fn test_exchange_spread_lists_at_most_five_rates() {
    let mut world = FakeWorld::populated();
    world.tables.insert(
        "ZZZ".to_string(),
        table(
            "ZZZ",
            &[
                ("AUD", 1.5),
                ("BRL", 5.1),
                ("CAD", 1.3),
                ("CHF", 0.9),
                ("DKK", 6.8),
                ("EUR", 0.92),
                ("GBP", 0.79),
                ("ZZZ", 1.0),
            ],
        ),
    );
    let llm = ScriptedLlm::new()
        .reply(&classification(
            "get_exchange_rate",
            r#"{"currency": "ZZZ", "target_currency": "JPY"}"#,
        ))
        .fail();
    let (_, _, agent) = agent(world, llm);

    let report = agent.handle_turn("tỷ giá ZZZ").await;

    assert_eq!(report.exchange_tier, Some(ExchangeTier::Spread));
    assert_eq!(report.reply_source, ReplySource::Template);
    let reply = &report.result.reply_text;
    let rate_lines = reply.lines().filter(|line| line.starts_with("- 1 ZZZ")).count();
    assert!(rate_lines <= 5 && rate_lines > 0, "{reply}");
    assert!(!reply.contains("= 1.00 ZZZ"));
    assert!(reply.contains("Không có tỷ giá ZZZ sang JPY hoặc USD"));
}

#[tokio::test]
async fn test_exchange_through_country_currency() {
    let llm = ScriptedLlm::new()
        .reply(&classification("get_exchange_rate", r#"{"country": "Vietnam"}"#))
        .fail();
    let (world, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("Tỷ giá tiền Việt Nam").await;

    assert_eq!(report.exchange_tier, Some(ExchangeTier::Requested));
    assert!(report.result.reply_text.contains("1 VND = 0.000039 USD"));
    assert_eq!(FakeWorld::count(&world.country_calls), 1);
    assert_eq!(FakeWorld::count(&world.exchange_calls), 1);
}

#[tokio::test]
async fn test_exchange_without_currency_asks_to_clarify() {
    let llm = ScriptedLlm::new()
        .reply(&classification("get_exchange_rate", r#"{"currency": "tiền"}"#))
        .fail();
    let (world, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("đổi tiền").await;

    assert_eq!(report.path, DispatchPath::Clarification);
    assert_eq!(report.exchange_tier, None);
    assert_eq!(report.result.reply_text, country_agent::messages::CLARIFY);
    assert_eq!(FakeWorld::count(&world.exchange_calls), 0);
}

#[tokio::test]
async fn test_comparison_names_the_missing_country() {
    let llm = ScriptedLlm::new().reply(&classification(
        "compare_countries",
        r#"{"country": ["Japan", "Wakanda"]}"#,
    ));
    let (world, llm, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("So sánh Nhật Bản và Wakanda").await;

    assert_eq!(report.path, DispatchPath::NotFound);
    assert_eq!(report.reply_source, ReplySource::Direct);
    assert!(report.result.reply_text.contains("'Wakanda'"));
    assert!(!report.result.reply_text.contains("'Japan'"));
    assert_eq!(FakeWorld::count(&world.country_calls), 2);
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn test_comparison_with_one_country_is_clarification() {
    let llm = ScriptedLlm::new()
        .reply(&classification("compare_countries", r#"{"country": "Japan"}"#))
        .fail();
    let (_, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("So sánh Nhật Bản").await;

    assert_eq!(report.intent, Intent::CompareCountries);
    assert_eq!(report.path, DispatchPath::Clarification);
}

#[tokio::test]
async fn test_comparison_second_lookup_failure_is_unavailable() {
    let mut world = FakeWorld::populated();
    world.unreachable_countries = vec!["South Korea".to_string()];
    let llm = ScriptedLlm::new().reply(&classification(
        "compare_countries",
        r#"{"country": ["Japan", "South Korea"]}"#,
    ));
    let (world, llm, agent) = agent(world, llm);

    let report = agent.handle_turn("So sánh Nhật Bản và Hàn Quốc").await;

    assert_eq!(report.path, DispatchPath::Unavailable);
    assert_eq!(report.reply_source, ReplySource::Direct);
    assert!(report.result.reply_text.contains("tạm thời không khả dụng"));
    assert!(report.result.map_coordinate.is_none());
    assert_eq!(FakeWorld::count(&world.country_calls), 2);
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn test_comparison_with_three_countries_is_clarification() {
    let llm = ScriptedLlm::new()
        .reply(&classification(
            "compare_countries",
            r#"{"country": ["Japan", "", "South Korea"]}"#,
        ))
        .fail();
    let (world, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("So sánh Nhật Bản, Hàn Quốc").await;

    assert_eq!(report.path, DispatchPath::Clarification);
    assert_eq!(FakeWorld::count(&world.country_calls), 0);
}

#[tokio::test]
async fn test_weather_without_place_is_clarification() {
    let llm = ScriptedLlm::new()
        .reply(&classification("get_weather", "{}"))
        .fail();
    let (world, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("Thời tiết thế nào?").await;

    assert_eq!(report.intent, Intent::GetWeather);
    assert_eq!(report.path, DispatchPath::Clarification);
    assert_eq!(report.result.reply_text, country_agent::messages::CLARIFY);
    assert_eq!(FakeWorld::count(&world.country_calls), 0);
    assert_eq!(FakeWorld::count(&world.weather_calls), 0);
}

#[tokio::test]
async fn test_news_without_country_is_clarification() {
    let llm = ScriptedLlm::new()
        .reply(&classification("get_news", "{}"))
        .fail();
    let (world, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("Có tin tức gì mới?").await;

    assert_eq!(report.intent, Intent::GetNews);
    assert_eq!(report.path, DispatchPath::Clarification);
    assert_eq!(report.result.reply_text, country_agent::messages::CLARIFY);
    assert_eq!(FakeWorld::count(&world.country_calls), 0);
    assert_eq!(FakeWorld::count(&world.news_calls), 0);
}

#[tokio::test]
async fn test_news_is_capped_in_provider_order() {
    let llm = ScriptedLlm::new()
        .reply(&classification("get_news", r#"{"country": "Vietnam"}"#))
        .fail();
    let (world, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("Tin tức mới nhất ở Việt Nam").await;

    let reply = &report.result.reply_text;
    let titles: Vec<&str> = reply
        .lines()
        .filter(|line| line.starts_with("- Tiêu đề số"))
        .collect();
    assert_eq!(titles.len(), 5);
    for (i, line) in titles.iter().enumerate() {
        assert!(line.starts_with(&format!("- Tiêu đề số {} ", i + 1)), "{line}");
    }
    assert_eq!(FakeWorld::count(&world.news_calls), 1);
}

#[tokio::test]
async fn test_news_for_unknown_country_skips_news_gateway() {
    let llm = ScriptedLlm::new().reply(&classification("get_news", r#"{"country": "Atlantis"}"#));
    let (world, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("Tin tức ở Atlantis").await;

    assert_eq!(report.path, DispatchPath::NotFound);
    assert!(report.result.reply_text.contains("Atlantis"));
    assert_eq!(FakeWorld::count(&world.news_calls), 0);
}

#[tokio::test]
async fn test_weather_for_unknown_place_is_explicit() {
    let llm = ScriptedLlm::new().reply(&classification("get_weather", r#"{"location": "Paris"}"#));
    let (world, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("Thời tiết ở Paris").await;

    assert_eq!(report.path, DispatchPath::NotFound);
    assert!(report.result.reply_text.contains("'Paris'"));
    assert!(report.result.map_coordinate.is_none());
    assert_eq!(FakeWorld::count(&world.weather_calls), 0);
}

#[tokio::test]
async fn test_weather_pins_the_capital() {
    let llm = ScriptedLlm::new()
        .reply(&classification("get_weather", r#"{"location": "Vietnam"}"#))
        .fail();
    let (_, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("Thời tiết ở Việt Nam thế nào?").await;

    assert_eq!(report.reply_source, ReplySource::Template);
    assert!(report.result.reply_text.contains("29.5°C"));
    assert_eq!(report.result.map_label.as_deref(), Some("Hanoi"));
    let coordinate = report.result.map_coordinate.unwrap();
    assert_eq!((coordinate.latitude, coordinate.longitude), (21.03, 105.85));
}

#[tokio::test]
async fn test_gateway_failure_is_unavailable_not_fatal() {
    let mut world = FakeWorld::populated();
    world.countries_down = true;
    let llm = ScriptedLlm::new().reply(&classification("get_country_info", r#"{"country": "Japan"}"#));
    let (_, _, agent) = agent(world, llm);

    let report = agent.handle_turn("Nhật Bản").await;

    assert_eq!(report.path, DispatchPath::Unavailable);
    assert!(report.result.reply_text.contains("tạm thời không khả dụng"));
    assert!(!report.result.reply_text.contains("connection refused"));
}

#[rstest]
#[case::prose("Sorry, I can't help with that.")]
#[case::truncated(r#"{"intent": "get_news", "entities": {"#)]
#[tokio::test]
async fn test_malformed_classifier_output_falls_back_to_chat(#[case] raw: &str) {
    let llm = ScriptedLlm::new().reply(raw).reply("Xin chào! Bạn cần giúp gì?");
    let (world, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("hello").await;

    assert_eq!(report.intent, Intent::GeneralChat);
    assert_eq!(report.path, DispatchPath::ClassifierFallback);
    assert_eq!(report.result.reply_text, "Xin chào! Bạn cần giúp gì?");
    assert_eq!(FakeWorld::count(&world.country_calls), 0);
}

#[tokio::test]
async fn test_classifier_and_synthesis_both_down_still_replies() {
    let (_, _, agent) = agent(FakeWorld::populated(), ScriptedLlm::new());

    let report = agent.handle_turn("Xin chào").await;

    assert_eq!(report.path, DispatchPath::ClassifierFallback);
    assert_eq!(report.reply_source, ReplySource::Template);
    assert_eq!(report.result.reply_text, country_agent::messages::GENERAL_CHAT);
}

#[tokio::test]
async fn test_unknown_intent_asks_for_clarification() {
    let llm = ScriptedLlm::new()
        .reply(&classification("book_flight", r#"{"country": "Japan"}"#))
        .reply("Bạn có thể nói rõ hơn không?");
    let (world, _, agent) = agent(FakeWorld::populated(), llm);

    let report = agent.handle_turn("đặt vé đi Nhật").await;

    assert_eq!(report.intent, Intent::Unrecognized);
    assert_eq!(report.path, DispatchPath::Clarification);
    assert_eq!(report.reply_source, ReplySource::Llm);
    assert_eq!(FakeWorld::count(&world.country_calls), 0);
}

#[tokio::test]
async fn test_identical_turns_take_identical_paths() {
    let script = || {
        ScriptedLlm::new()
            .reply(&classification(
                "get_exchange_rate",
                r#"{"currency": "JPY", "target_currency": "EUR"}"#,
            ))
            .fail()
    };

    let (_, _, first_agent) = agent(FakeWorld::populated(), script());
    let (_, _, second_agent) = agent(FakeWorld::populated(), script());
    let first = first_agent.handle_turn("1 yên bằng bao nhiêu euro").await;
    let second = second_agent.handle_turn("1 yên bằng bao nhiêu euro").await;

    assert_eq!(first.intent, second.intent);
    assert_eq!(first.path, second.path);
    assert_eq!(first.exchange_tier, second.exchange_tier);
    assert_eq!(first.exchange_tier, Some(ExchangeTier::ReferenceSubstitute));
    assert_eq!(first.result, second.result);
}

#[tokio::test]
async fn test_blank_message_is_answered_directly() {
    let (_, llm, agent) = agent(FakeWorld::populated(), ScriptedLlm::new());

    let report = agent.handle_turn("   ").await;

    assert_eq!(report.reply_source, ReplySource::Direct);
    assert!(!report.result.reply_text.is_empty());
    assert_eq!(llm.call_count(), 0);
}
