//! Mascot chatter shown after a new expense is saved.
//!
//! Each category maps to one fixed message family; the line itself is a
//! uniform pick from that family's pool, with the fresh amount appended.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::stats::format_amount;

const CAT_MESSAGES: [&str; 3] = [
    "喵～今天也來記一筆，未來就有更多小零食可以買了 🐟",
    "存下來的小錢，可以變成未來的一大碗罐罐喔！",
    "不要小看每一筆 50 元，貓貓都在幫你默默加總～",
];

const DOG_MESSAGES: [&str; 3] = [
    "汪！今天也有好好照顧荷包，真是乖孩子 🐾",
    "每記一筆支出，就離夢想又近一點點！",
    "汪汪提醒：偶爾也要獎勵自己一點點，但要量力而為喔。",
];

const MOM_MESSAGES: [&str; 3] = [
    "孩子，錢不是長在樹上的喔，記帳就是在照顧未來的自己 👩",
    "這週餐飲有點多喔～要不要考慮自己煮幾餐？",
    "看到你認真記帳，媽媽是真的很欣慰！",
];

/// Source of the pool index, injectable so callers can pin the pick.
pub trait RandomSource {
    /// Returns an index in `0..bound`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// Clock-seeded source for interactive use.
#[derive(Debug, Default)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn next_index(&mut self, bound: usize) -> usize {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        nanos as usize % bound
    }
}

fn family(category: &str) -> (&'static str, &'static [&'static str]) {
    match category {
        "food" => ("👩", &MOM_MESSAGES),
        "entertainment" | "shopping" => ("🐱", &CAT_MESSAGES),
        _ => ("🐶", &DOG_MESSAGES),
    }
}

/// Pool of messages the given category draws from, prefix excluded.
#[must_use]
pub fn family_pool(category: &str) -> &'static [&'static str] {
    family(category).1
}

/// Picks a mascot line for a freshly created expense.
#[must_use]
pub fn message_for(category: &str, amount: i64, source: &mut impl RandomSource) -> String {
    let (prefix, pool) = family(category);
    let message = pool[source.next_index(pool.len())];
    format!("{prefix} {message}（剛剛那筆是 {} ）", format_amount(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(usize);

    impl RandomSource for Fixed {
        fn next_index(&mut self, bound: usize) -> usize {
            self.0 % bound
        }
    }

    #[test]
    fn food_draws_from_the_mom_pool() {
        let line = message_for("food", 80, &mut Fixed(1));
        assert!(line.starts_with("👩"));
        assert!(line.contains(MOM_MESSAGES[1]));
        assert!(line.contains("NT$ 80"));
    }

    #[test]
    fn entertainment_and_shopping_share_the_cat_pool() {
        for category in ["entertainment", "shopping"] {
            let line = message_for(category, 1500, &mut Fixed(0));
            assert!(line.starts_with("🐱"));
            assert!(line.contains(CAT_MESSAGES[0]));
            assert!(line.contains("NT$ 1,500"));
        }
    }

    #[test]
    fn unknown_categories_fall_back_to_the_dog_pool() {
        for category in ["transport", "other", ""] {
            assert_eq!(family_pool(category), &DOG_MESSAGES);
        }
    }

    #[test]
    fn system_source_stays_within_the_pool() {
        let mut source = SystemRandom;
        let line = message_for("other", 30, &mut source);
        assert!(
            DOG_MESSAGES
                .iter()
                .any(|candidate| line.contains(candidate))
        );
    }
}
