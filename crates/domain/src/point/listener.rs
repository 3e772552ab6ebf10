/// Receives the ids of points whose value changes should be relayed.
///
/// Implemented by the host's device listener; point ids are passed in
/// their underscored form.
#[cfg_attr(test, mockall::automock)]
pub trait PointListener: Send + Sync {
    fn register_point(&self, point_id: &str);
}
