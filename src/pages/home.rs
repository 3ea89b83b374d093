use leptos::prelude::*;

use crate::components::graph_view::{GraphHandle, GraphView, ZoomDirection};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// The handle is `!Send`; children of ErrorBoundary must be `Send`.
	let graph = StoredValue::new_local(GraphHandle::default());

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<GraphView handle={graph.get_value()} fullscreen=true />
				<div class="graph-overlay">
					<h1>"BioProject Graph"</h1>
					<p class="subtitle">
						"Hover a node for its summary. Click to open its BioProject record. Drag to pan, scroll to zoom."
					</p>
					<div class="graph-controls">
						<button on:click=move |_| graph.with_value(|g| g.zoom(ZoomDirection::In))>"+"</button>
						<button on:click=move |_| graph.with_value(|g| g.zoom(ZoomDirection::Out))>"-"</button>
						<button on:click=move |_| graph.with_value(GraphHandle::clear)>"Clear"</button>
						<button on:click=move |_| graph.with_value(GraphHandle::reload)>"Reload"</button>
					</div>
				</div>
			</div>
		</ErrorBoundary>
	}
}
