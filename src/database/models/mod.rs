pub mod blog;
pub mod client;
pub mod company;
pub mod experience;
pub mod links;
pub mod project;
pub mod project_task;
pub mod responsibility;
pub mod technology;
pub mod user;

pub use blog::{Blog, BlogCreate, BlogSearch, BlogUpdate, PublishQuery};
pub use client::{Client, ClientCreate, ClientTokenRequest, NewClient};
pub use company::{Company, CompanyCreate, CompanyFilter, CompanyUpdate};
pub use experience::{
    ProfessionalExperience, ProfessionalExperienceCreate, ProfessionalExperienceFilter, ProfessionalExperienceUpdate,
};
pub use links::{
    CompanyExperience, CompanyExperienceCreate, CompanyExperienceFilter, TechnologyExperience,
    TechnologyExperienceCreate, TechnologyExperienceFilter, TechnologyProject, TechnologyProjectCreate,
    TechnologyProjectFilter,
};
pub use project::{Project, ProjectCreate, ProjectFilter, ProjectUpdate};
pub use project_task::{ProjectTask, ProjectTaskCreate, ProjectTaskFilter, ProjectTaskUpdate};
pub use responsibility::{Responsibility, ResponsibilityCreate, ResponsibilityFilter, ResponsibilityUpdate};
pub use technology::{Technology, TechnologyCreate, TechnologyFilter, TechnologyUpdate};
pub use user::{ApiUser, TokenRequest, UserInDb};
