//! # 주간 신선도 창 (Freshness window)
//!
//! 뉴스레터는 "매주 정해진 요일/시각"을 경계로 한 창 안에서만 유효합니다.
//! 기본값은 일요일 09:00 (주의 시작 + 09시)입니다.
//!
//! ```text
//!   ... ──┬───────────── 창 N ─────────────┬──── 창 N+1 ...
//!      일 09:00                         일 09:00
//!         ▲ anchor_before(now)     now ▲
//! ```
//!
//! 저장된 뉴스레터의 `created_date`가 `anchor_before(now)` 이상이면 신선(fresh),
//! 아니면 오래된(stale) 것으로 판단합니다. 이 값은 매 호출마다 다시 계산되며
//! 어떤 플래그로도 저장되지 않습니다.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveTime, Utc, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessWindow {
    weekday: Weekday,
    time: NaiveTime,
    /// 기준 시각을 해석할 지역 시간대 (고정 오프셋)
    offset: FixedOffset,
}

impl Default for FreshnessWindow {
    fn default() -> Self {
        Self::new(Weekday::Sun, 9, *Local::now().offset())
    }
}

impl FreshnessWindow {
    /// `hour`는 0~23으로 잘립니다.
    pub fn new(weekday: Weekday, hour: u32, offset: FixedOffset) -> Self {
        let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
        Self {
            weekday,
            time,
            offset,
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// `now` 이전(또는 같은 시각)에 마지막으로 지나간 기준 시각
    pub fn anchor_before(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local = now.with_timezone(&self.offset);
        let days_back = (local.weekday().num_days_from_sunday() + 7
            - self.weekday.num_days_from_sunday())
            % 7;

        let anchor_local = (local.date_naive() - Duration::days(i64::from(days_back))).and_time(self.time);
        let anchor =
            (anchor_local - Duration::seconds(i64::from(self.offset.local_minus_utc()))).and_utc();

        // 기준 요일 당일이지만 아직 기준 시각 전이면 지난주 기준 시각이 유효합니다.
        if anchor > now {
            anchor - Duration::days(7)
        } else {
            anchor
        }
    }

    pub fn is_fresh(&self, created_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        created_date >= self.anchor_before(now)
    }
}
