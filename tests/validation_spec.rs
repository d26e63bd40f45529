use acme_planner::models::*;
use acme_planner::validation::*;
use chrono::{DateTime, TimeZone, Utc};
use speculate2::speculate;
use uuid::Uuid;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
}

fn spam(terms: &[&str]) -> SpamRule {
    SpamRule::new(terms.iter().map(|t| t.to_string()).collect())
}

fn task_form(beginning: &str, ending: &str, workload: &str) -> TaskForm {
    TaskForm {
        title: "Prepare release notes".to_string(),
        beginning: beginning.to_string(),
        ending: ending.to_string(),
        workload: workload.to_string(),
        description: "Collect the changes of the sprint".to_string(),
        link: "https://example.org".to_string(),
        privacy: "PUBLIC".to_string(),
    }
}

fn work_plan(privacy: Privacy, beginning: &str, ending: &str) -> WorkPlan {
    let window = DateWindow::parse(beginning, ending, "es").unwrap();
    WorkPlan {
        id: Uuid::new_v4(),
        task_id: Uuid::new_v4(),
        title: "Plan".to_string(),
        beginning: window.beginning,
        ending: window.ending,
        privacy,
        created_at: now(),
        updated_at: now(),
    }
}

fn keys(violations: &Violations) -> Vec<&str> {
    violations.iter().map(|v| v.key.as_str()).collect()
}

speculate! {
    before {
        let rule = spam(&["cheap", "viagra"]);
        let ctx = ValidationContext::new("es", now(), &rule);
        let validator = TaskValidator::default();
    }

    describe "workload parsing" {
        it "reads a comma fraction as padded minutes" {
            let workload = Workload::parse("1,5").unwrap();
            assert_eq!(workload.total_minutes(), 110.0);
        }

        it "reads two fraction digits literally" {
            let workload = Workload::parse("2.05").unwrap();
            assert_eq!(workload.total_minutes(), 125.0);
        }
    }

    describe "date windows" {
        it "parses spanish dates day first" {
            let window = DateWindow::parse("30/10/2025 17:15", "30/10/2025 17:45", "es").unwrap();
            assert_eq!(window.elapsed_minutes(), 30);
        }

        it "rejects spanish dates in the default locale" {
            assert!(DateWindow::parse("30/10/2025 17:15", "30/10/2025 17:45", "en").is_err());
        }
    }

    describe "task rules" {
        it "accepts a valid submission" {
            let form = task_form("30/10/2025 17:15", "30/10/2025 18:45", "1,30");
            assert!(validator.validate(&form, &[], &ctx).is_empty());
        }

        it "accepts plans that share the task window" {
            let mut form = task_form("30/10/2025 17:15", "30/10/2025 18:45", "1,30");
            form.privacy = "PRIVATE".to_string();
            let plans = [work_plan(Privacy::Private, "30/10/2025 17:15", "30/10/2025 18:45")];

            assert!(validator.validate(&form, &plans, &ctx).is_empty());
        }

        it "flags a workload longer than the window" {
            let form = task_form("30/10/2025 17:15", "30/10/2025 17:45", "0.35");
            let violations = validator.validate(&form, &[], &ctx);

            assert_eq!(keys(&violations), vec!["manager.task.form.workload.error3"]);
        }

        it "flags both fields when the window is empty" {
            let form = task_form("30/10/2025 17:15", "30/10/2025 17:15", "0.00");
            let violations = validator.validate(&form, &[], &ctx);

            assert!(violations.contains("ending", "manager.task.form.ending.error3"));
            assert!(violations.contains("beginning", "manager.task.form.beginning.error2"));
        }

        it "flags windows in the past" {
            let form = task_form("30/10/2024 17:15", "30/10/2024 18:45", "1.30");
            let violations = validator.validate(&form, &[], &ctx);

            assert_eq!(
                keys(&violations),
                vec!["manager.task.form.beginning.error1", "manager.task.form.ending.error1"]
            );
        }

        it "flags an ending before the beginning" {
            let form = task_form("30/10/2025 18:45", "30/10/2025 17:15", "0.10");
            let violations = validator.validate(&form, &[], &ctx);

            assert!(violations.contains("ending", "manager.task.form.ending.error2"));
            assert!(violations.contains("workload", "manager.task.form.workload.error3"));
        }

        it "flags short years" {
            let form = task_form("30/10/25 17:15", "30/10/2025 18:45", "1.30");
            let violations = validator.validate(&form, &[], &ctx);

            assert!(violations.contains("beginning", "manager.task.form.date.error"));
            assert!(!violations.contains("ending", "manager.task.form.date.error"));
        }

        it "checks every workload rule independently" {
            let form = task_form("30/10/2025 17:15", "30/10/2025 18:45", "0.075");
            let violations = validator.validate(&form, &[], &ctx);

            assert_eq!(
                keys(&violations),
                vec!["manager.task.form.workload.error1", "manager.task.form.workload.error4"]
            );
        }

        it "keeps workloads under a hundred hours" {
            let form = task_form("30/10/2025 17:15", "30/12/2025 17:15", "100");
            let violations = validator.validate(&form, &[], &ctx);

            assert_eq!(keys(&violations), vec!["manager.task.form.workload.error2"]);
        }

        it "rejects a zero workload" {
            let form = task_form("30/10/2025 17:15", "30/10/2025 18:45", "0");
            let violations = validator.validate(&form, &[], &ctx);

            assert_eq!(keys(&violations), vec!["manager.task.form.workload.error2"]);
        }

        it "flags spam in title and description" {
            let mut form = task_form("30/10/2025 17:15", "30/10/2025 18:45", "1.30");
            form.title = "Buy CHEAP watches now".to_string();
            form.description = "Viagra".to_string();
            let violations = validator.validate(&form, &[], &ctx);

            assert!(violations.contains("title", "manager.task.form.title.error"));
            assert!(violations.contains("description", "manager.task.form.description.error"));
        }

        it "matches upper-case spam terms" {
            let upper = spam(&["CHEAP"]);
            let mut form = task_form("30/10/2025 17:15", "30/10/2025 18:45", "1.30");
            form.title = "cheap watches".to_string();
            let violations = validator.validate(&form, &[], &ValidationContext::new("es", now(), &upper));

            assert!(violations.contains("title", "manager.task.form.title.error"));
        }

        it "prevents a private downgrade over public plans" {
            let mut form = task_form("30/10/2025 17:15", "30/10/2025 18:45", "1.30");
            form.privacy = "PRIVATE".to_string();
            let public = [work_plan(Privacy::Public, "30/10/2025 17:15", "30/10/2025 18:45")];
            let private = [work_plan(Privacy::Private, "30/10/2025 17:15", "30/10/2025 18:45")];

            assert!(validator.validate(&form, &public, &ctx).contains("privacy", "manager.task.form.privacy.error"));
            assert!(!validator.validate(&form, &private, &ctx).contains("privacy", "manager.task.form.privacy.error"));
        }

        it "skips everything when the workload is blank" {
            let mut form = task_form("30/10/2020 17:15", "30/10/2020 17:15", "");
            form.title = "cheap".to_string();

            assert!(validator.validate(&form, &[], &ctx).is_empty());
        }

        it "is idempotent" {
            let mut form = task_form("30/10/2025 17:15", "30/10/2025 17:15", "0,75");
            form.title = "cheap".to_string();

            let first = validator.validate(&form, &[], &ctx);
            let second = validator.validate(&form, &[], &ctx);
            assert!(!first.is_empty());
            assert_eq!(first, second);
        }

        it "reports format errors when asked" {
            let reporting = ctx.with_policy(FormatErrorPolicy::Report);
            let form = task_form("2025/10/30 17:15", "30/10/2025 17:45", "1.30");
            let violations = validator.validate(&form, &[], &reporting);

            assert_eq!(violations.len(), 1);
            assert!(violations.contains("beginning", "manager.task.form.format.error"));
        }
    }

    describe "work plan rules" {
        before {
            let parent = DateWindow::parse("30/10/2025 08:00", "30/10/2025 20:00", "es").unwrap();
        }

        it "flags spam in a public title" {
            let form = WorkPlanForm {
                task_id: None,
                title: "Cheap plan".to_string(),
                beginning: "30/10/2025 17:15".to_string(),
                ending: "30/10/2025 17:45".to_string(),
                privacy: "PUBLIC".to_string(),
            };
            let violations = WorkPlanValidator::default().validate(&form, &parent, &ctx);

            assert_eq!(keys(&violations), vec!["manager.workplan.error.spam"]);
        }

        it "flags an empty window on both fields" {
            let form = WorkPlanForm {
                task_id: None,
                title: "Plan".to_string(),
                beginning: "30/10/2025 17:15".to_string(),
                ending: "30/10/2025 17:15".to_string(),
                privacy: "PRIVATE".to_string(),
            };
            let violations = WorkPlanValidator::default().validate(&form, &parent, &ctx);

            assert_eq!(
                keys(&violations),
                vec!["manager.workplan.form.ending.error3", "manager.workplan.form.beginning.error2"]
            );
        }

        it "flags a plan reaching outside its task" {
            let form = WorkPlanForm {
                task_id: None,
                title: "Plan".to_string(),
                beginning: "30/10/2025 07:00".to_string(),
                ending: "31/10/2025 10:00".to_string(),
                privacy: "PRIVATE".to_string(),
            };
            let violations = WorkPlanValidator::default().validate(&form, &parent, &ctx);

            assert_eq!(
                keys(&violations),
                vec![
                    "manager.workplan.form.beginning.outside-task",
                    "manager.workplan.form.ending.outside-task"
                ]
            );
        }
    }
}
