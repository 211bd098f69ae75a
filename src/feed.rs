//! Typed client for the pass-through listing endpoints the community pages
//! read: events, internship postings, and the combined dashboard feed.
//! Filtering happens server-side via query parameters; this client only
//! shapes requests and decodes payloads.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::identity::Nationality;
use crate::messages::Locale;

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: u64,
    pub title: String,
    pub title_ko: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub date: String,
    pub location: String,
    pub location_ko: String,
    pub description: String,
    pub description_ko: String,
    #[serde(rename = "forForeigners", default)]
    pub for_foreigners: bool,
    #[serde(rename = "forKoreans", default)]
    pub for_koreans: bool,
    pub organizer: String,
}

impl Event {
    pub fn title(&self, locale: Locale) -> &str {
        match locale {
            Locale::Korean => &self.title_ko,
            Locale::English => &self.title,
        }
    }

    pub fn location(&self, locale: Locale) -> &str {
        match locale {
            Locale::Korean => &self.location_ko,
            Locale::English => &self.location,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub id: u64,
    pub title: String,
    pub title_ko: String,
    pub company: String,
    pub company_ko: String,
    pub location: String,
    pub location_ko: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: String,
    pub salary: String,
    pub description: String,
    pub description_ko: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(rename = "forForeigners", default)]
    pub for_foreigners: bool,
    #[serde(rename = "forKoreans", default)]
    pub for_koreans: bool,
    #[serde(rename = "visaSponsorship", default)]
    pub visa_sponsorship: bool,
    pub deadline: String,
}

impl Job {
    pub fn title(&self, locale: Locale) -> &str {
        match locale {
            Locale::Korean => &self.title_ko,
            Locale::English => &self.title,
        }
    }

    pub fn company(&self, locale: Locale) -> &str {
        match locale {
            Locale::Korean => &self.company_ko,
            Locale::English => &self.company,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct JobsResponse {
    pub jobs: Vec<Job>,
    pub total: usize,
}

/// Combined dashboard payload from `/api/all`.
#[derive(Debug, Deserialize)]
pub struct AllContent {
    pub events: Vec<Event>,
    pub jobs: Vec<Job>,
    pub total_events: usize,
    pub total_jobs: usize,
}

pub struct FeedClient {
    base_url: String,
    agent: ureq::Agent,
}

impl FeedClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_millis(timeout_ms))
                .build(),
        }
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ureq::Response> {
        let mut req = self.agent.get(&format!("{}{}", self.base_url, path));
        for (key, value) in query {
            req = req.query(key, value);
        }
        match req.call() {
            Ok(r) => Ok(r),
            Err(ureq::Error::Status(code, _)) => Err(anyhow!("{} returned {}", path, code)),
            Err(e) => Err(anyhow!("request failed: {}", e)),
        }
    }

    pub fn all(&self, nationality: Option<Nationality>) -> Result<AllContent> {
        let mut query = Vec::new();
        if let Some(n) = nationality {
            query.push(("nationality", n.as_str().to_string()));
        }
        Ok(self.get("/api/all", &query)?.into_json()?)
    }

    pub fn events(
        &self,
        nationality: Option<Nationality>,
        category: Option<&str>,
    ) -> Result<EventsResponse> {
        let mut query = Vec::new();
        if let Some(n) = nationality {
            query.push(("nationality", n.as_str().to_string()));
        }
        if let Some(c) = category {
            query.push(("category", c.to_string()));
        }
        Ok(self.get("/api/events", &query)?.into_json()?)
    }

    pub fn jobs(
        &self,
        nationality: Option<Nationality>,
        visa_sponsorship: Option<bool>,
    ) -> Result<JobsResponse> {
        let mut query = Vec::new();
        if let Some(n) = nationality {
            query.push(("nationality", n.as_str().to_string()));
        }
        if let Some(v) = visa_sponsorship {
            query.push(("visa_sponsorship", v.to_string()));
        }
        Ok(self.get("/api/jobs", &query)?.into_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT_JSON: &str = r#"{
        "id": 2,
        "title": "Korean Language Exchange",
        "title_ko": "한국어 언어 교환",
        "type": "event",
        "category": "language",
        "date": "2026-02-10",
        "location": "Hongdae, Seoul",
        "location_ko": "홍대, 서울",
        "description": "Practice Korean with native speakers in a friendly cafe setting.",
        "description_ko": "친근한 카페에서 원어민과 한국어를 연습하세요.",
        "forForeigners": true,
        "forKoreans": true,
        "image": "https://images.unsplash.com/photo?w=400",
        "organizer": "Language Bridge Seoul"
    }"#;

    #[test]
    fn test_event_deserializes_mixed_key_styles() {
        let event: Event = serde_json::from_str(EVENT_JSON).unwrap();
        assert_eq!(event.kind, "event");
        assert!(event.for_foreigners);
        assert_eq!(event.title(Locale::Korean), "한국어 언어 교환");
        assert_eq!(event.title(Locale::English), "Korean Language Exchange");
    }

    #[test]
    fn test_job_deserializes() {
        let json = r#"{
            "id": 101,
            "title": "Software Engineering Intern",
            "title_ko": "소프트웨어 엔지니어 인턴",
            "company": "Samsung Electronics",
            "company_ko": "삼성전자",
            "location": "Suwon, Korea",
            "location_ko": "수원",
            "type": "internship",
            "duration": "6 months",
            "salary": "₩2,500,000/month",
            "description": "Join our mobile development team.",
            "description_ko": "모바일 개발팀에 합류하세요.",
            "requirements": ["CS Major", "Python or Java"],
            "forForeigners": true,
            "forKoreans": true,
            "visaSponsorship": true,
            "deadline": "2026-02-28"
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert!(job.visa_sponsorship);
        assert_eq!(job.requirements.len(), 2);
        assert_eq!(job.company(Locale::Korean), "삼성전자");
    }

    #[test]
    fn test_all_content_shape() {
        let json = format!(
            r#"{{"events": [{}], "jobs": [], "total_events": 1, "total_jobs": 0}}"#,
            EVENT_JSON
        );
        let all: AllContent = serde_json::from_str(&json).unwrap();
        assert_eq!(all.total_events, 1);
        assert!(all.jobs.is_empty());
    }
}
