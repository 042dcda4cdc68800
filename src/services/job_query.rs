//! Search and department filtering over a job listing. Pure functions; the
//! caller supplies the jobs it already read.

use crate::models::job::Job;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    search: Option<String>,
    department: Option<String>,
}

impl JobFilter {
    /// Blank values mean "no filter".
    pub fn new(search: Option<String>, department: Option<String>) -> Self {
        let search = search
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty());
        let department = department.filter(|dept| !dept.is_empty());
        Self { search, department }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.department.is_none()
    }

    pub fn matches(&self, job: &Job) -> bool {
        self.matches_search(job) && self.matches_department(job)
    }

    fn matches_search(&self, job: &Job) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        job.job_title.to_lowercase().contains(term)
            || job
                .skills
                .iter()
                .any(|skill| skill.to_lowercase().contains(term))
    }

    fn matches_department(&self, job: &Job) -> bool {
        match &self.department {
            Some(department) => job.department == *department,
            None => true,
        }
    }

    /// Keeps the matching jobs in their original order.
    pub fn apply(&self, jobs: Vec<Job>) -> Vec<Job> {
        if self.is_empty() {
            return jobs;
        }
        jobs.into_iter().filter(|job| self.matches(job)).collect()
    }
}

/// Distinct departments in first-seen order.
pub fn departments(jobs: &[Job]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for job in jobs {
        if !seen.iter().any(|dept| dept == &job.department) {
            seen.push(job.department.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobFields;
    use crate::utils::time::now;

    fn job(title: &str, department: &str, skills: &[&str]) -> Job {
        Job::new(
            JobFields {
                job_title: title.to_string(),
                department: department.to_string(),
                skills: skills.iter().map(|s| s.to_string()).collect(),
                experience: "2 years".to_string(),
                salary: "$80k".to_string(),
                location: "Remote".to_string(),
            },
            now(),
        )
    }

    fn titles(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|j| j.job_title.as_str()).collect()
    }

    fn sample() -> Vec<Job> {
        vec![
            job("Backend Engineer", "Engineering", &["Go", "SQL"]),
            job("Data Analyst", "Analytics", &["SQL", "Tableau"]),
            job("Recruiter", "People", &["Sourcing"]),
        ]
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let filter = JobFilter::new(Some("backend".into()), None);
        assert_eq!(titles(&filter.apply(sample())), vec!["Backend Engineer"]);
    }

    #[test]
    fn search_matches_skills() {
        let filter = JobFilter::new(Some("sql".into()), None);
        assert_eq!(
            titles(&filter.apply(sample())),
            vec!["Backend Engineer", "Data Analyst"]
        );

        let filter = JobFilter::new(Some("tab".into()), None);
        assert_eq!(titles(&filter.apply(sample())), vec!["Data Analyst"]);
    }

    #[test]
    fn department_is_exact_and_case_sensitive() {
        let filter = JobFilter::new(None, Some("Engineering".into()));
        assert_eq!(titles(&filter.apply(sample())), vec!["Backend Engineer"]);

        let filter = JobFilter::new(None, Some("engineering".into()));
        assert!(filter.apply(sample()).is_empty());
    }

    #[test]
    fn filters_compose_with_and() {
        let filter = JobFilter::new(Some("SQL".into()), Some("Analytics".into()));
        assert_eq!(titles(&filter.apply(sample())), vec!["Data Analyst"]);

        let filter = JobFilter::new(Some("Sourcing".into()), Some("Engineering".into()));
        assert!(filter.apply(sample()).is_empty());
    }

    #[test]
    fn blank_filters_pass_everything_through() {
        let filter = JobFilter::new(Some("   ".into()), Some(String::new()));
        assert!(filter.is_empty());
        assert_eq!(filter.apply(sample()).len(), 3);
    }

    #[test]
    fn departments_are_distinct_in_first_seen_order() {
        let mut jobs = sample();
        jobs.push(job("Staff Engineer", "Engineering", &["Rust"]));
        assert_eq!(departments(&jobs), vec!["Engineering", "Analytics", "People"]);
    }
}
