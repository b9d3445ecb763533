//! Message tags exchanged during task allocation.

/// The closed set of things a vehicle and a parcel say to each other.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Protocol {
    /// Parcel → everyone in range: "I need a vehicle."
    WhoCanPickMeUp,
    /// Vehicle → parcel: a bid.
    ICan,
    /// Parcel → winning vehicle: the assignment.
    PickMeUp,
}
