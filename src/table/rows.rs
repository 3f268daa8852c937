use super::{CellValue, Column, TableRow};
use crate::models::{
    AtRiskTrainee, CourseAttention, CourseRanking, CourseTypeCount, EngagementPoint, GroupAverages,
    GroupRanking, ImproverRanking, MonthlyTrend, TraineeRanking, TrainingRecord,
};

use super::ColumnKind::{Date, Integer, Number, Text};

impl TableRow for TrainingRecord {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("id", "ID", Integer),
            Column::new("trainee_name", "Trainee Name", Text),
            Column::new("email", "Email", Text),
            Column::new("branch", "Branch", Text),
            Column::new("district_head", "District Head", Text),
            Column::new("supervisor", "Supervisor", Text),
            Column::new("course_title", "Course Title", Text),
            Column::new("completion_rate", "Completion Rate", Number),
            Column::new("pre_assessment_score", "Pre-Assessment Score", Number),
            Column::new("post_assessment_score", "Post-Assessment Score", Number),
            Column::new("average_quiz_score", "Average Quiz Score", Number),
            Column::new("course_type", "Course Type", Text),
            Column::new("completion_date", "Completion Date", Date),
            Column::new("training_hours", "Training Hours", Number),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "trainee_name" => self.trainee_name.as_str().into(),
            "email" => self.email.as_str().into(),
            "branch" => self.branch.as_str().into(),
            "district_head" => self.district_head.as_str().into(),
            "supervisor" => self.supervisor.as_str().into(),
            "course_title" => self.course_title.as_str().into(),
            "completion_rate" => self.completion_rate.into(),
            "pre_assessment_score" => self.pre_assessment_score.into(),
            "post_assessment_score" => self.post_assessment_score.into(),
            "average_quiz_score" => self.average_quiz_score.into(),
            "course_type" => self.course_type.as_str().into(),
            "completion_date" => self.completion_date.into(),
            "training_hours" => self.training_hours.into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for TraineeRanking {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("rank", "Rank", Integer),
            Column::new("name", "Trainee", Text),
            Column::new("email", "Email", Text),
            Column::new("branch", "Branch", Text),
            Column::new("avg_score", "Avg Score", Number),
            Column::new("assessments", "Assessments", Integer),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "rank" => self.rank.into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "branch" => self.branch.as_str().into(),
            "avg_score" => self.avg_score.into(),
            "assessments" => self.assessments.into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for GroupRanking {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("rank", "Rank", Integer),
            Column::new("name", "Name", Text),
            Column::new("avg_rate", "Avg Completion", Number),
            Column::new("trainees", "Trainees", Integer),
            Column::new("records", "Records", Integer),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "rank" => self.rank.into(),
            "name" => self.name.as_str().into(),
            "avg_rate" => self.avg_rate.into(),
            "trainees" => self.trainees.into(),
            "records" => self.records.into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for ImproverRanking {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("rank", "Rank", Integer),
            Column::new("name", "Trainee", Text),
            Column::new("email", "Email", Text),
            Column::new("avg_improvement", "Avg Improvement %", Number),
            Column::new("improvements", "Improved Courses", Integer),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "rank" => self.rank.into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "avg_improvement" => self.avg_improvement.into(),
            "improvements" => self.improvements.into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for CourseRanking {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("rank", "Rank", Integer),
            Column::new("course_title", "Course", Text),
            Column::new("avg_completion", "Avg Completion", Number),
            Column::new("avg_score", "Avg Score", Number),
            Column::new("performance_score", "Performance", Number),
            Column::new("records", "Records", Integer),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "rank" => self.rank.into(),
            "course_title" => self.course_title.as_str().into(),
            "avg_completion" => self.avg_completion.into(),
            "avg_score" => self.avg_score.into(),
            "performance_score" => self.performance_score.into(),
            "records" => self.records.into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for AtRiskTrainee {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("name", "Trainee", Text),
            Column::new("email", "Email", Text),
            Column::new("branch", "Branch", Text),
            Column::new("supervisor", "Supervisor", Text),
            Column::derived("reason_count", "Flags", Integer),
            Column::new("reasons", "Reasons", Text),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "branch" => self.branch.as_str().into(),
            "supervisor" => self.supervisor.as_str().into(),
            "reason_count" => self.reasons.len().into(),
            "reasons" => self.reasons.join("; ").into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for CourseAttention {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("course_title", "Course", Text),
            Column::new("avg_completion", "Avg Completion", Number),
            Column::new("avg_score", "Avg Score", Number),
            Column::new("learners", "Learners", Integer),
            Column::derived("issues", "Issues", Text),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "course_title" => self.course_title.as_str().into(),
            "avg_completion" => self.avg_completion.into(),
            "avg_score" => self.avg_score.into(),
            "learners" => self.learners.into(),
            "issues" => {
                let mut issues = Vec::new();
                if self.low_completion {
                    issues.push("low completion");
                }
                if self.low_score {
                    issues.push("low score");
                }
                issues.join(", ").into()
            }
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for GroupAverages {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("name", "Name", Text),
            Column::new("avg_completion", "Avg Completion", Number),
            Column::new("avg_quiz_score", "Avg Quiz Score", Number),
            Column::new("records", "Records", Integer),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "name" => self.name.as_str().into(),
            "avg_completion" => self.avg_completion.into(),
            "avg_quiz_score" => self.avg_quiz_score.into(),
            "records" => self.records.into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for CourseTypeCount {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("course_type", "Course Type", Text),
            Column::new("count", "Records", Integer),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "course_type" => self.course_type.as_str().into(),
            "count" => self.count.into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for MonthlyTrend {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("label", "Month", Text),
            Column::new("avg_completion", "Avg Completion", Number),
            Column::new("moving_average", "3-Month Avg", Number),
            Column::new("total_hours", "Training Hours", Number),
            Column::new("records", "Records", Integer),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "label" => self.label.as_str().into(),
            "avg_completion" => self.avg_completion.into(),
            "moving_average" => self.moving_average.into(),
            "total_hours" => self.total_hours.into(),
            "records" => self.records.into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for EngagementPoint {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("name", "Trainee", Text),
            Column::new("total_hours", "Training Hours", Number),
            Column::new("avg_score", "Avg Post Score", Number),
            Column::new("records", "Records", Integer),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "name" => self.name.as_str().into(),
            "total_hours" => self.total_hours.into(),
            "avg_score" => self.avg_score.into(),
            "records" => self.records.into(),
            _ => CellValue::Empty,
        }
    }
}
