//! Keyword rules the assistant answers from
//!
//! A [`ResponseBook`] is an ordered list of rules plus a fallback. Matching
//! is a case-insensitive substring test and the first rule that matches
//! wins, so rule order is significant.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Greeting,
    Skills,
    Projects,
    Experience,
    Contact,
    About,
}

/// A rule's answer: one fixed string, or several variants picked at random.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Fixed(String),
    OneOf(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRule {
    pub topic: Topic,
    pub keywords: Vec<String>,
    pub response: Response,
}

impl ResponseRule {
    /// `lowered` must already be lowercase. Blank keywords never match.
    fn matches(&self, lowered: &str) -> bool {
        self.keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .any(|k| lowered.contains(&k.to_lowercase()))
    }
}

/// The reply chosen for one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// `None` when the fallback answered.
    pub topic: Option<Topic>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBook {
    pub rules: Vec<ResponseRule>,
    pub fallback: String,
}

impl ResponseBook {
    /// The stock book, personalised with the owner's name.
    pub fn for_owner(name: &str) -> Self {
        let first = name.split_whitespace().next().unwrap_or(name);
        let first_lower = first.trim().to_lowercase();
        let mut about_keywords = vec!["about", "who"];
        if !first_lower.is_empty() {
            about_keywords.push(first_lower.as_str());
        }

        let rule = |topic, keywords: &[&str], response| ResponseRule {
            topic,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            response,
        };

        Self {
            rules: vec![
                rule(
                    Topic::Greeting,
                    &["hi", "hello", "hey"],
                    Response::OneOf(vec![
                        "Hello! How can I help you today?".to_string(),
                        format!("Hi! I'm {first}'s assistant. Type !send <message> if you want to email {first} directly!"),
                        format!("Greetings! Ask me about {first}'s skills or projects."),
                    ]),
                ),
                rule(
                    Topic::Skills,
                    &["skill", "tech", "know"],
                    Response::Fixed(format!(
                        "{first} is proficient in Python (Flask), JavaScript, Flutter/Dart, and SQL, with extensive experience on AWS services like EC2, RDS, and S3."
                    )),
                ),
                rule(
                    Topic::Projects,
                    &["project", "work", "build"],
                    Response::Fixed(
                        "Key projects include a production-ready delivery CRM on AWS, a delivery agent app in Flutter, and a phone recording app. Check out the projects section for more details!".to_string(),
                    ),
                ),
                rule(
                    Topic::Experience,
                    &["exp", "hackathon", "lead"],
                    Response::Fixed(format!(
                        "{first} has a strong background in lead roles, including leading a team through a national hackathon."
                    )),
                ),
                rule(
                    Topic::Contact,
                    &["contact", "email", "reach"],
                    Response::Fixed(format!(
                        "You can reach {first} through the contact form (press m). Better yet, type !send followed by your message here!"
                    )),
                ),
                rule(
                    Topic::About,
                    &about_keywords,
                    Response::Fixed(format!(
                        "{name} is a full-stack developer and cloud enthusiast who loves building scalable systems and leading teams to success."
                    )),
                ),
            ],
            fallback: format!(
                "I'm not sure about that. Try asking about skills, projects, or type !send <your message> to email {first} directly!"
            ),
        }
    }

    /// First rule whose keywords occur in `input`, ignoring case.
    pub fn matching_rule(&self, input: &str) -> Option<&ResponseRule> {
        let lowered = input.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lowered))
    }

    pub fn classify<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> Classification {
        let Some(rule) = self.matching_rule(input) else {
            return Classification {
                topic: None,
                text: self.fallback.clone(),
            };
        };

        let text = match &rule.response {
            Response::Fixed(text) => text.clone(),
            Response::OneOf(variants) => pick_variant(rng, variants)
                .cloned()
                .unwrap_or_else(|| self.fallback.clone()),
        };

        Classification {
            topic: Some(rule.topic),
            text,
        }
    }
}

impl Default for ResponseBook {
    fn default() -> Self {
        Self::for_owner("Alex Morgan")
    }
}

/// Uniformly pick one of `variants`. `None` only for an empty slice.
pub fn pick_variant<'a, R: Rng + ?Sized>(rng: &mut R, variants: &'a [String]) -> Option<&'a String> {
    variants.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn book() -> ResponseBook {
        ResponseBook::for_owner("Alex Morgan")
    }

    fn fixed(book: &ResponseBook, topic: Topic) -> String {
        match &book.rules.iter().find(|r| r.topic == topic).unwrap().response {
            Response::Fixed(text) => text.clone(),
            Response::OneOf(_) => panic!("{topic:?} has variants"),
        }
    }

    #[test]
    fn test_skills_question() {
        let book = book();
        let mut rng = StdRng::seed_from_u64(1);
        let reply = book.classify("tell me about your skills", &mut rng);
        assert_eq!(reply.topic, Some(Topic::Skills));
        assert_eq!(reply.text, fixed(&book, Topic::Skills));
    }

    #[test]
    fn test_first_rule_wins() {
        let book = book();
        // "project" and "email" both match; projects comes first
        assert_eq!(book.matching_rule("email me the project").unwrap().topic, Topic::Projects);
        // "hey" beats "skill"
        assert_eq!(book.matching_rule("hey, skills?").unwrap().topic, Topic::Greeting);
    }

    #[test]
    fn test_matching_ignores_case() {
        let book = book();
        assert_eq!(book.matching_rule("HACKATHON wins").unwrap().topic, Topic::Experience);
        assert_eq!(book.matching_rule("Who is ALEX").unwrap().topic, Topic::About);
        assert_eq!(book.matching_rule("REACH out").unwrap().topic, Topic::Contact);
    }

    #[test]
    fn test_owner_name_triggers_about() {
        let book = book();
        assert_eq!(book.matching_rule("alex?").unwrap().topic, Topic::About);
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let book = book();
        let mut rng = StdRng::seed_from_u64(7);
        let reply = book.classify("qwerty", &mut rng);
        assert_eq!(reply.topic, None);
        assert_eq!(reply.text, book.fallback);
    }

    #[test]
    fn test_blank_owner_name_keeps_fallback_reachable() {
        let mut rng = StdRng::seed_from_u64(7);
        for name in ["", "   "] {
            let book = ResponseBook::for_owner(name);
            let reply = book.classify("qwerty", &mut rng);
            assert_eq!(reply.topic, None, "owner name {name:?}");
            assert_eq!(reply.text, book.fallback);
        }
    }

    #[test]
    fn test_blank_keyword_never_matches() {
        let book = ResponseBook {
            rules: vec![ResponseRule {
                topic: Topic::About,
                keywords: vec![String::new(), " ".to_string(), "who".to_string()],
                response: Response::Fixed("about".to_string()),
            }],
            fallback: "fallback".to_string(),
        };
        assert!(book.matching_rule("qwerty").is_none());
        assert_eq!(book.matching_rule("who?").unwrap().topic, Topic::About);
    }

    #[test]
    fn test_greetings_cover_all_variants() {
        let book = book();
        let variants = match &book.rules[0].response {
            Response::OneOf(v) => v.clone(),
            Response::Fixed(_) => unreachable!(),
        };
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for input in ["hi", "hello", "hey"].iter().cycle().take(300) {
            let reply = book.classify(input, &mut rng);
            assert_eq!(reply.topic, Some(Topic::Greeting));
            seen.insert(reply.text);
        }
        assert_eq!(seen.len(), variants.len());
    }

    #[test]
    fn test_pick_variant_is_deterministic_under_seed() {
        let variants: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| pick_variant(&mut rng, &variants).unwrap().clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(9), picks(9));
    }

    #[test]
    fn test_pick_variant_is_roughly_uniform() {
        let variants: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let mut counts = [0usize; 3];
        for _ in 0..3_000 {
            let pick = pick_variant(&mut rng, &variants).unwrap();
            counts[variants.iter().position(|v| v == pick).unwrap()] += 1;
        }
        for count in counts {
            assert!((800..1200).contains(&count), "skewed counts {counts:?}");
        }
    }

    #[test]
    fn test_pick_variant_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(pick_variant(&mut rng, &[]).is_none());
    }

    #[test]
    fn test_book_serde_round_trip_keeps_shapes() {
        let book = book();
        let json = serde_json::to_string(&book).unwrap();
        let parsed: ResponseBook = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, book);
    }
}
