//! The six analysis questions.
//!
//! Each question reads the shared table, renders its charts and returns an
//! [`Answer`] in print order. Thresholds quoted in answers are derived from
//! the data.

use anyhow::{Context, Result};
use bank_chart::{ChartRenderer, ChartShape, ChartSpec};
use bank_model::Table;
use bank_stats::{
    Bins, ChiSquare, GroupProportions, SIGNIFICANCE_LEVEL, ScoringFn, chi_square_independence,
    count_where, distribution, expected_counts, mean, median_and_threshold_stats,
    proportion_by_group, quantile, select_top_feature, value_counts,
};
use tracing::{debug, info, warn};

use crate::report::{Answer, ReportLine, ReportValue, SavedChart};

/// Personal columns scored against `default`.
pub const DEFAULT_FEATURES: [&str; 7] = [
    "age",
    "job",
    "marital",
    "education",
    "balance",
    "housing",
    "loan",
];

/// Personal columns scored against `housing`.
pub const HOUSING_FEATURES: [&str; 7] = [
    "age",
    "job",
    "marital",
    "education",
    "default",
    "balance",
    "loan",
];

const SHARE_AXIS: &str = "Share (%)";
const PROBABILITY_AXIS: &str = "Probability";

/// Shared inputs of every question.
pub struct QuestionContext<'a> {
    pub table: &'a Table,
    pub renderer: &'a ChartRenderer,
}

impl QuestionContext<'_> {
    fn render(&self, answer: &mut Answer, spec: &ChartSpec, shape: &ChartShape) -> Result<()> {
        let path = self
            .renderer
            .render(spec, shape)
            .with_context(|| format!("failed to render {}", spec.file_name))?;
        answer.chart(SavedChart {
            title: spec.title.clone(),
            file_name: spec.file_name.clone(),
            path,
        });
        Ok(())
    }

    fn mask(&self, column: &str, label: &str) -> Result<Vec<bool>> {
        Ok(self.table.mask_eq(column, label)?)
    }
}

/// Signature shared by the question functions.
pub type QuestionFn = fn(&QuestionContext<'_>) -> Result<Answer>;

/// All questions in print order.
pub const QUESTIONS: [QuestionFn; 6] = [
    loan_tendency_by_job,
    contacts_vs_success,
    recommended_calls,
    previous_outcome_relevance,
    credit_insurance_driver,
    housing_loan_profile,
];

/// Question 1: which job is most likely to hold a loan, and of which kind.
pub fn loan_tendency_by_job(ctx: &QuestionContext<'_>) -> Result<Answer> {
    let mut answer = Answer::new(1, "Loan tendency by job");
    let proportions = proportion_by_group(ctx.table, "job", &["housing", "loan"], "yes")?;
    let ranked = ranked(&proportions)?;

    let spec = ChartSpec::new("Loans by job", "bar_chart_loan_housing.png")
        .with_axes("Job", SHARE_AXIS)
        .with_legend(["Has a loan", "No loan"]);
    ctx.render(&mut answer, &spec, &stacked(&ranked))?;

    let (job, share) = ranked.top().context("no job has any clients")?;
    let housing = count_where(ctx.table, &[("job", job), ("housing", "yes")])?;
    let personal = count_where(ctx.table, &[("job", job), ("loan", "yes")])?;
    answer.line(ReportLine::text("Job most likely to hold a loan", job));
    answer.line(ReportLine::percent("Share with any loan", share));
    answer.line(ReportLine::count("Housing loans", housing));
    answer.line(ReportLine::count("Personal loans", personal));
    let kind = if housing >= personal { "housing" } else { "personal" };
    answer.line(ReportLine::text("Prevailing loan type", kind));
    Ok(answer)
}

/// Question 2: success rate per number of contacts.
pub fn contacts_vs_success(ctx: &QuestionContext<'_>) -> Result<Answer> {
    let mut answer = Answer::new(2, "Contacts vs campaign success");
    let proportions = proportion_by_group(ctx.table, "campaign", &["y"], "yes")?;
    report_undefined(&proportions);

    let spec = ChartSpec::new(
        "Campaign success by number of contacts",
        "bar_chart_calls_success.png",
    )
    .with_axes("Number of contacts", SHARE_AXIS)
    .with_legend(["Success", "Failure"]);
    ctx.render(&mut answer, &spec, &stacked(&proportions))?;

    let last_success = proportions
        .matching_counts
        .iter()
        .rev()
        .find(|(_, hits)| *hits > 0.0)
        .map(|(label, _)| label.to_string())
        .context("no contact count produced a success")?;
    let best = proportions
        .top()
        .map(|(label, share)| format!("{label} ({share:.2}%)"))
        .unwrap_or_default();
    answer.line(ReportLine::count(
        "Distinct contact counts",
        proportions.totals.len(),
    ));
    answer.line(ReportLine::text("Contact count with the highest success rate", best));
    answer.line(ReportLine::text(
        "Largest contact count with a success",
        last_success,
    ));
    Ok(answer)
}

/// Question 3: recommended mean and maximum number of calls.
pub fn recommended_calls(ctx: &QuestionContext<'_>) -> Result<Answer> {
    let mut answer = Answer::new(3, "Recommended number of calls");
    let success = ctx.mask("y", "yes")?;
    let calls = ctx.table.numeric_where("campaign", &success)?;

    answer.line(ReportLine::number("Mean number of calls", mean(&calls)?, 2));

    let spec = ChartSpec::new("Contacts until success", "hist_cumu_call_success.png")
        .with_axes("Number of contacts", PROBABILITY_AXIS);
    ctx.render(
        &mut answer,
        &spec,
        &ChartShape::CumulativeHistogram {
            samples: vec![calls.clone()],
            bins: Bins::Distinct,
        },
    )?;

    for (q, label) in [(0.95, "95th"), (0.99, "99th")] {
        let limit = quantile(&calls, q)?.ceil();
        let within = calls.iter().filter(|&&value| value <= limit).count();
        let share = within as f64 / calls.len() as f64 * 100.0;
        answer.line(ReportLine::number(
            format!("Calls at the {label} percentile of successes"),
            limit,
            0,
        ));
        answer.line(ReportLine::percent(
            format!("Successes within {limit} calls"),
            share,
        ));
    }
    Ok(answer)
}

/// Question 4: does a previous success carry over to the current campaign?
pub fn previous_outcome_relevance(ctx: &QuestionContext<'_>) -> Result<Answer> {
    let mut answer = Answer::new(4, "Previous outcome relevance");
    let previous = ctx.mask("poutcome", "success")?;
    let clients = previous.iter().filter(|&&hit| hit).count();
    let current = distribution(ctx.table, "y", &previous)?;
    let overall = distribution(ctx.table, "y", &vec![true; ctx.table.height()])?;

    answer.line(ReportLine::count("Clients with a previous success", clients));
    let spec = ChartSpec::new(
        "Current outcome after a previous success",
        "bar_chart_prev_curr.png",
    )
    .with_axes("Success in the current campaign", SHARE_AXIS);
    ctx.render(
        &mut answer,
        &spec,
        &ChartShape::Bar {
            series: current.clone(),
        },
    )?;

    answer.line(ReportLine::percent(
        "Current success after a previous success",
        current.value("yes")?,
    ));
    answer.line(ReportLine::percent(
        "Current success overall",
        overall.value("yes")?,
    ));
    Ok(answer)
}

/// Question 5: which client attribute should drive a credit insurance demand.
pub fn credit_insurance_driver(ctx: &QuestionContext<'_>) -> Result<Answer> {
    let mut answer = Answer::new(5, "Credit insurance driver");
    top_features(ctx, &mut answer, &DEFAULT_FEATURES, "default")?;

    let defaulters = ctx.mask("default", "yes")?;
    let chi = chi_square_against_overall(ctx.table, "loan", &defaulters)?;
    report_chi_square(&mut answer, "loan", &chi);

    let loan_shares = distribution(ctx.table, "loan", &defaulters)?;
    answer.line(ReportLine::percent(
        "Defaulters with a personal loan",
        loan_shares.value("yes")?,
    ));
    answer.line(ReportLine::percent(
        "Defaulters without a personal loan",
        loan_shares.value("no")?,
    ));
    let loan_holders = ctx.mask("loan", "yes")?;
    let default_shares = distribution(ctx.table, "default", &loan_holders)?;
    answer.line(ReportLine::percent(
        "Personal loan holders in default",
        default_shares.value("yes")?,
    ));

    let solvent = ctx.mask("default", "no")?;
    let balance_default = ctx.table.numeric_where("balance", &defaulters)?;
    let balance_solvent = ctx.table.numeric_where("balance", &solvent)?;
    let spec = ChartSpec::new("Balance distribution", "hist_balance.png")
        .with_axes("Balance (€)", PROBABILITY_AXIS)
        .with_legend(["In default", "Not in default"]);
    ctx.render(
        &mut answer,
        &spec,
        &ChartShape::OverlaidHistogram {
            samples: vec![balance_default.clone(), balance_solvent.clone()],
            bins: 100,
            x_range: Some((-4057.0, 20_000.0)),
            y_max: Some(6e-4),
        },
    )?;

    let stats = median_and_threshold_stats(&balance_default, &balance_solvent)?;
    answer.line(ReportLine::new(
        "Median balance in default",
        ReportValue::Currency(stats.median_a),
    ));
    answer.line(ReportLine::new(
        "Median balance not in default",
        ReportValue::Currency(stats.threshold),
    ));
    answer.line(ReportLine::percent(
        format!("In default with balance above €{:.2}", stats.threshold),
        stats.pct_a_above,
    ));
    answer.line(ReportLine::percent(
        format!("Not in default with balance below €{:.2}", stats.threshold),
        stats.pct_b_below,
    ));
    Ok(answer)
}

/// Question 6: most prominent traits of housing loan holders.
pub fn housing_loan_profile(ctx: &QuestionContext<'_>) -> Result<Answer> {
    let mut answer = Answer::new(6, "Housing loan profile");
    top_features(ctx, &mut answer, &HOUSING_FEATURES, "housing")?;
    let holders = ctx.mask("housing", "yes")?;

    housing_by_category(
        ctx,
        &mut answer,
        &holders,
        "job",
        ChartSpec::new("Housing loans by job", "bar_chart_housing_job.png")
            .with_axes("Job", SHARE_AXIS),
    )?;

    let others = ctx.mask("housing", "no")?;
    let ages_holders = ctx.table.numeric_where("age", &holders)?;
    let ages_others = ctx.table.numeric_where("age", &others)?;
    let spec = ChartSpec::new("Age of housing loan holders", "hist_cumu_age_housing.png")
        .with_axes("Age (years)", PROBABILITY_AXIS)
        .with_legend(["Has a housing loan", "No housing loan"]);
    ctx.render(
        &mut answer,
        &spec,
        &ChartShape::CumulativeHistogram {
            samples: vec![ages_holders.clone(), ages_others.clone()],
            bins: Bins::Count(20),
        },
    )?;
    answer.line(ReportLine::new(
        "Mean age with a housing loan",
        ReportValue::Number {
            value: mean(&ages_holders)?,
            decimals: 2,
            unit: "years",
        },
    ));
    answer.line(ReportLine::new(
        "Mean age without a housing loan",
        ReportValue::Number {
            value: mean(&ages_others)?,
            decimals: 2,
            unit: "years",
        },
    ));

    housing_by_category(
        ctx,
        &mut answer,
        &holders,
        "education",
        ChartSpec::new(
            "Housing loans by education level",
            "bar_chart_education_housing.png",
        )
        .with_axes("Education level", SHARE_AXIS),
    )?;
    Ok(answer)
}

/// Report the best feature under each scoring function.
fn top_features(
    ctx: &QuestionContext<'_>,
    answer: &mut Answer,
    features: &[&str],
    target: &str,
) -> Result<()> {
    for scoring in [ScoringFn::AnovaF, ScoringFn::MutualInformation] {
        let top = select_top_feature(ctx.table, features, target, scoring, 1)
            .with_context(|| format!("failed to score features against '{target}'"))?;
        let name = top.into_iter().next().context("no feature selected")?;
        debug!(target_column = target, scoring = %scoring, feature = %name, "selected top feature");
        answer.line(ReportLine::text(scoring.label(), name));
    }
    Ok(())
}

/// Chi-square test and ranked stacked bar of `column` among housing loan holders.
fn housing_by_category(
    ctx: &QuestionContext<'_>,
    answer: &mut Answer,
    holders: &[bool],
    column: &str,
    spec: ChartSpec,
) -> Result<()> {
    let chi = chi_square_against_overall(ctx.table, column, holders)?;
    report_chi_square(answer, column, &chi);

    let proportions = proportion_by_group(ctx.table, column, &["housing"], "yes")?;
    let ranked = ranked(&proportions)?;
    let spec = spec.with_legend(["Has a housing loan", "No housing loan"]);
    ctx.render(answer, &spec, &stacked(&ranked))?;

    if let Some((label, share)) = ranked.top() {
        answer.line(ReportLine::percent(
            format!("Highest housing loan share ({column} = {label})"),
            share,
        ));
    }
    Ok(())
}

/// Goodness of fit of `column` within `subset` against the whole table.
fn chi_square_against_overall(table: &Table, column: &str, subset: &[bool]) -> Result<ChiSquare> {
    let categories = table.categorical(column)?;
    let overall = value_counts(categories, None)?;
    let observed = value_counts(categories, Some(subset))?;
    let expected = expected_counts(&observed, &overall)?;
    let chi = chi_square_independence(&observed, &expected)
        .with_context(|| format!("chi-square test on '{column}' failed"))?;
    info!(
        column,
        statistic = chi.statistic,
        p_value = chi.p_value,
        significant = chi.is_significant(SIGNIFICANCE_LEVEL),
        "chi-square test"
    );
    Ok(chi)
}

fn report_chi_square(answer: &mut Answer, column: &str, chi: &ChiSquare) {
    answer.line(ReportLine::number(
        format!("Chi-square ({column})"),
        chi.statistic,
        2,
    ));
    answer.line(ReportLine::new(
        format!("P-value ({column})"),
        ReportValue::PValue(chi.p_value),
    ));
}

fn ranked(proportions: &GroupProportions) -> Result<GroupProportions> {
    report_undefined(proportions);
    Ok(proportions.ranked()?)
}

fn report_undefined(proportions: &GroupProportions) {
    let undefined = proportions.undefined_groups();
    if !undefined.is_empty() {
        warn!(
            column = %proportions.group_column,
            groups = ?undefined,
            "groups without rows have no defined share"
        );
    }
}

fn stacked(proportions: &GroupProportions) -> ChartShape {
    ChartShape::StackedBar {
        lower: proportions.matching.clone(),
        upper: proportions.complement.clone(),
    }
}
