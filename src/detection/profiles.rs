use super::config::ActivityProfile;
use crate::motion::FeatureVector;

impl ActivityProfile {
    pub fn matches(&self, features: &FeatureVector) -> bool {
        features.peak_acceleration < self.peak_max
            && features.variance < self.variance_max
            && features.jerk < self.jerk_max
            && features.rotation_magnitude < self.rotation_max
    }
}

/// First ordinary-activity profile the features fall inside, if any.
pub fn matching_profile<'a>(
    profiles: &'a [ActivityProfile],
    features: &FeatureVector,
) -> Option<&'a ActivityProfile> {
    profiles.iter().find(|profile| profile.matches(features))
}

pub fn is_normal_activity(profiles: &[ActivityProfile], features: &FeatureVector) -> bool {
    matching_profile(profiles, features).is_some()
}
