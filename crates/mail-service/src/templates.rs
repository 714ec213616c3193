//! 通知邮件模板
//!
//! 所有用户输入的内容都会先做HTML转义再拼接到模板中。

use crate::EmailMessage;
use std::borrow::Cow;

/// 新项目通知需要的项目信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub title: String,
    pub role: String,
    pub description: String,
    pub timeline: String,
    pub deadline_to_apply: String,
}

/// 邮件模板
#[derive(Debug, Clone)]
pub struct Templates {
    frontend_url: String,
}

impl Templates {
    pub fn new(frontend_url: impl Into<String>) -> Self {
        let frontend_url = frontend_url.into();
        Self {
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        }
    }

    /// 用户控制台地址，邮件中的按钮都指向这里
    pub fn dashboard_url(&self) -> String {
        format!("{}/user/dashboard", self.frontend_url)
    }

    pub fn welcome(&self, to: &str, user_name: &str) -> EmailMessage {
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #f97316;">Welcome to Projectify! 🎉</h1>
  <p>Hi {name},</p>
  <p>Welcome to Projectify! We're excited to have you join our platform where amazing projects come to life.</p>
  <h3>What's next?</h3>
  <ul>
    <li>Browse available projects in your dashboard</li>
    <li>Apply to projects that match your skills</li>
    <li>Track your application status in real-time</li>
  </ul>
  <p>Happy project hunting!</p>
  <p><strong>The Projectify Team</strong></p>
  <hr>
  <p style="font-size: 12px; color: #666;">This email was sent to {email}. If you didn't create an account, please ignore this email.</p>
</div>"#,
            name = escape_html(user_name),
            email = escape_html(to),
        );

        EmailMessage {
            to: to.to_string(),
            subject: "Welcome to Projectify!".to_string(),
            html,
        }
    }

    pub fn application_approved(&self, to: &str, user_name: &str, project_name: &str) -> EmailMessage {
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #10b981;">Congratulations! 🎉</h1>
  <p>Hi {name},</p>
  <p>Fantastic news! Your application for the project "<strong>{project}</strong>" has been approved!</p>
  <div style="background-color: #ecfdf5; border-left: 4px solid #10b981; padding: 20px; margin: 20px 0;">
    <p style="margin: 0;"><strong>What happens next?</strong></p>
    <ul style="margin: 10px 0;">
      <li>Check your dashboard for project details and timeline</li>
      <li>You may receive additional communication from the project team</li>
    </ul>
  </div>
  <p style="text-align: center;"><a href="{dashboard}" style="background-color: #10b981; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px;">Open Dashboard</a></p>
  <p><strong>The Projectify Team</strong></p>
</div>"#,
            name = escape_html(user_name),
            project = escape_html(project_name),
            dashboard = self.dashboard_url(),
        );

        EmailMessage {
            to: to.to_string(),
            subject: format!(r#"Your application for "{project_name}" has been approved!"#),
            html,
        }
    }

    pub fn application_rejected(&self, to: &str, user_name: &str, project_name: &str) -> EmailMessage {
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #f97316;">Application Update</h1>
  <p>Hi {name},</p>
  <p>Thank you for your interest in the project "<strong>{project}</strong>". After careful consideration, we've decided to move forward with other candidates for this particular project.</p>
  <div style="background-color: #fef3c7; border-left: 4px solid #f59e0b; padding: 20px; margin: 20px 0;">
    <p style="margin: 0;"><strong>Don't let this discourage you!</strong></p>
    <p style="margin: 10px 0;">There are many other exciting projects available on our platform.</p>
  </div>
  <p><strong>The Projectify Team</strong></p>
  <hr>
  <p style="text-align: center;"><a href="{dashboard}" style="background-color: #f97316; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px;">Browse More Projects</a></p>
</div>"#,
            name = escape_html(user_name),
            project = escape_html(project_name),
            dashboard = self.dashboard_url(),
        );

        EmailMessage {
            to: to.to_string(),
            subject: format!(r#"Update on your application for "{project_name}""#),
            html,
        }
    }

    pub fn new_project(&self, to: &str, user_name: &str, project: &ProjectSummary) -> EmailMessage {
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #f97316;">New Project Available! 🚀</h1>
  <p>Hello {name},</p>
  <p>A new project has been posted on the platform.</p>
  <div style="background-color: #f3f4f6; padding: 20px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #f97316;">
    <h3 style="margin-top: 0; color: #374151;">Project Details:</h3>
    <p><strong>Project Title:</strong> {title}</p>
    <p><strong>Role:</strong> {role}</p>
    <p><strong>Description:</strong> {description}</p>
    <p><strong>Timeline:</strong> {timeline}</p>
    <p><strong>Deadline to Apply:</strong> {deadline}</p>
  </div>
  <p style="text-align: center; margin: 30px 0;"><a href="{dashboard}" style="background-color: #f97316; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; font-weight: bold;">View Project &amp; Apply</a></p>
  <p>Please log in to your dashboard to view and apply.</p>
  <p>Thank you,<br><strong>Projectify Team</strong></p>
</div>"#,
            name = escape_html(user_name),
            title = escape_html(&project.title),
            role = escape_html(&project.role),
            description = escape_html(&project.description),
            timeline = escape_html(&project.timeline),
            deadline = escape_html(&project.deadline_to_apply),
            dashboard = self.dashboard_url(),
        );

        EmailMessage {
            to: to.to_string(),
            subject: format!("📢 New Project Available - {}", project.title),
            html,
        }
    }
}

/// 转义用户输入，邮件正文和属性值中都可以安全使用
fn escape_html(input: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(input)
}
