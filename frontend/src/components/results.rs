use super::super::{Model, Msg};
use shared::sort::sort_detections;
use shared::{Detection, SessionStatus, SortDirection, SortKey};
use yew::prelude::*;

pub fn render_results(model: &Model, ctx: &Context<Model>) -> Html {
    let session = model.session.session();
    if session.status() != SessionStatus::Ready {
        return html! {};
    }
    let Some(annotated) = session.annotated_image() else {
        return html! {};
    };

    // Always sorted from the fetched order.
    let rows: Vec<Detection> = match model.sort {
        Some(state) => sort_detections(session.detections(), state.key, state.direction),
        None => session.detections().to_vec(),
    };

    html! {
        <div class="results-section">
            <div class="results-grid">
                <div class="result-card">
                    <div class="card-header">
                        <h3 class="card-title">{"Annotated Image"}</h3>
                        <span class="card-badge">{ format!("{} Objects", rows.len()) }</span>
                    </div>
                    <div class="annotated-image-wrapper">
                        <img src={model.client.config().media_url(annotated)}
                            alt="Annotated"
                            class="annotated-image" />
                    </div>
                </div>

                <div class="result-card">
                    <div class="card-header">
                        <h3 class="card-title">{"Detection Results"}</h3>
                        <span class="card-badge">{"Sortable"}</span>
                    </div>
                    <div class="table-wrapper">
                        <table class="results-table">
                            <thead>
                                <tr>
                                    { render_header_cell(model, ctx, SortKey::Class, "Object") }
                                    { render_header_cell(model, ctx, SortKey::Confidence, "Confidence") }
                                    { render_header_cell(model, ctx, SortKey::Box, "Box") }
                                </tr>
                            </thead>
                            <tbody>
                                { for rows.iter().map(render_row) }
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
}

fn render_header_cell(model: &Model, ctx: &Context<Model>, key: SortKey, label: &'static str) -> Html {
    let active = model.sort.filter(|state| state.key == key);
    let icon = match active.map(|state| state.direction) {
        Some(SortDirection::Asc) => "▲",
        _ => "▼",
    };

    html! {
        <th
            class={classes!(active.is_some().then_some("sorted"))}
            onclick={ctx.link().callback(move |_| Msg::SortBy(key))}
            data-key={key.to_string()}
        >
            { label }{" "}<span class="sort-icon">{ icon }</span>
        </th>
    }
}

fn render_row(detection: &Detection) -> Html {
    html! {
        <tr>
            <td><span class="object-class">{ &detection.class }</span></td>
            <td>
                <div class="confidence-bar">
                    <div class="confidence-progress">
                        <div class="confidence-fill" style={format!("width: {}", detection.confidence)}></div>
                    </div>
                    <span class="confidence-value">{ &detection.confidence }</span>
                </div>
            </td>
            <td><span class="bbox-coords">{ format!("[{}]", detection.box_label().replace(',', ", ")) }</span></td>
        </tr>
    }
}
