use super::ILiveClassRepo;
use crate::repos::shared::inmemory_repo::*;
use campus_scheduler_domain::{LiveClass, ID};

pub struct InMemoryLiveClassRepo {
    classes: std::sync::Mutex<Vec<LiveClass>>,
}

impl InMemoryLiveClassRepo {
    pub fn new() -> Self {
        Self {
            classes: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ILiveClassRepo for InMemoryLiveClassRepo {
    async fn insert(&self, class: &LiveClass) -> anyhow::Result<()> {
        insert(class, &self.classes);
        Ok(())
    }

    async fn save(&self, class: &LiveClass) -> anyhow::Result<()> {
        save(class, &self.classes);
        Ok(())
    }

    async fn find(&self, class_id: &ID) -> Option<LiveClass> {
        find(class_id, &self.classes)
    }

    async fn find_all_active(&self) -> anyhow::Result<Vec<LiveClass>> {
        Ok(find_by(&self.classes, |class: &LiveClass| class.is_active))
    }

    async fn delete(&self, class_id: &ID) -> anyhow::Result<()> {
        delete(class_id, &self.classes);
        Ok(())
    }
}
