//! Fixed user-facing replies for the paths that never reach the language model

pub const WELCOME: &str = "Chào mừng đến với Agent Tra Cứu Quốc Gia!";

pub const NO_INFORMATION: &str = "Không có thông tin";

pub const CLARIFY: &str = "Xin lỗi, tôi chưa hiểu rõ yêu cầu của bạn. Bạn có thể nói rõ hơn về quốc gia, thời tiết, tỷ giá hoặc tin tức bạn muốn tra cứu không?";

pub const GENERAL_CHAT: &str = "Xin chào! Tôi có thể giúp bạn tra cứu thông tin quốc gia, so sánh các nước, xem thời tiết, tỷ giá hoặc tin tức. Bạn muốn hỏi gì?";

pub const TRAVEL_UNAVAILABLE: &str = "Xin lỗi, hiện tôi chưa thể đưa ra gợi ý du lịch. Vui lòng thử lại sau.";

pub const EMPTY_MESSAGE: &str = "Vui lòng nhập câu hỏi.";

pub const COUNTRY_NAME_REQUIRED: &str = "Vui lòng cung cấp tên quốc gia.";

#[must_use]
pub fn country_not_found(name: &str) -> String {
    format!("Không tìm thấy thông tin cho quốc gia '{name}'.")
}

#[must_use]
pub fn countries_not_found(names: &[&str]) -> String {
    let quoted = names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(" và ");
    format!("Không tìm thấy thông tin cho quốc gia {quoted}, nên chưa thể so sánh.")
}

#[must_use]
pub fn location_not_found(name: &str) -> String {
    format!("Không tìm thấy địa điểm '{name}'. Hiện tôi chỉ tra cứu được thời tiết theo tên quốc gia.")
}

#[must_use]
pub fn currency_not_found(code: &str) -> String {
    format!("Không tìm thấy tỷ giá cho mã tiền tệ '{code}'.")
}

#[must_use]
pub fn no_news(country: &str) -> String {
    format!("Hiện không có tin tức nổi bật nào cho {country}.")
}

/// A data source failed within this turn
#[must_use]
pub fn unavailable(capability: &str) -> String {
    format!("Dịch vụ {capability} tạm thời không khả dụng. Vui lòng thử lại sau.")
}
