//! Back-office lists: gardens, courses and garden requests.

pub mod courses;
pub mod gardens;
pub mod requests;

use std::sync::Arc;

pub use courses::{
    Course,
    CourseSortField,
    CourseState,
};
pub use gardens::{
    Garden,
    GardenSortField,
    GardenStatus,
};
pub use requests::{
    GardenRequest,
    RequestSortField,
    RequestStatus,
};
use tokio::runtime::Handle;

use crate::{
    core::{
        ApiClient,
        ListError,
        RestCollection,
    },
    list::ListController,
};

pub type GardenList = ListController<Garden, RestCollection<Garden>>;
pub type CourseList = ListController<Course, RestCollection<Course>>;
pub type RequestList = ListController<GardenRequest, RestCollection<GardenRequest>>;

pub struct AdminPanel {
    pub gardens: GardenList,
    pub courses: CourseList,
    pub requests: RequestList,
}

impl AdminPanel {
    pub fn new(client: &ApiClient, runtime: Handle) -> Self {
        Self {
            gardens: ListController::new(
                Arc::new(RestCollection::new(client.clone())),
                runtime.clone(),
            ),
            courses: ListController::new(
                Arc::new(RestCollection::new(client.clone())),
                runtime.clone(),
            ),
            requests: ListController::new(Arc::new(RestCollection::new(client.clone())), runtime),
        }
    }

    /// Loads the three lists concurrently and returns the failures.
    pub async fn load_all(&mut self) -> Vec<ListError> {
        let (gardens, courses, requests) = futures::join!(
            self.gardens.load_all(),
            self.courses.load_all(),
            self.requests.load_all()
        );

        [gardens.err(), courses.err(), requests.err()].into_iter().flatten().collect()
    }

    /// Applies arrived mutation results on every list; returns how many settled.
    pub fn poll_results(&mut self) -> usize {
        self.gardens.poll_results().len()
            + self.courses.poll_results().len()
            + self.requests.poll_results().len()
    }

    pub fn dispose(&mut self) {
        self.gardens.dispose();
        self.courses.dispose();
        self.requests.dispose();
    }
}
